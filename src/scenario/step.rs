//! The fixed step table of the smoke scenario.
//!
//! Each [`Step`] knows its human label, the HTTP method and path template it
//! exercises, and the single status code the backend must answer with.

use std::fmt;

use reqwest::{Method, StatusCode};
use serde::Serialize;

/// One request/assert step of the smoke scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Optional `/health` probe issued before registration
    HealthCheck,
    Register,
    Login,
    CurrentUser,
    CreateCommunity,
    CreateChannel,
    SendMessage,
    ListMessages,
    AddReaction,
    GetMessage,
    UpdateProfile,
    DeleteMessage,
    /// Optional re-fetch of the deleted message
    ConfirmDeleted,
    ListCommunities,
}

impl Step {
    /// The twelve steps every run executes, in order
    pub const SEQUENCE: [Step; 12] = [
        Step::Register,
        Step::Login,
        Step::CurrentUser,
        Step::CreateCommunity,
        Step::CreateChannel,
        Step::SendMessage,
        Step::ListMessages,
        Step::AddReaction,
        Step::GetMessage,
        Step::UpdateProfile,
        Step::DeleteMessage,
        Step::ListCommunities,
    ];

    /// Steps for a run with the given optional checks enabled, in execution order
    pub fn plan(preflight: bool, verify_delete: bool) -> Vec<Step> {
        let mut steps = Vec::with_capacity(Self::SEQUENCE.len() + 2);
        if preflight {
            steps.push(Step::HealthCheck);
        }
        for step in Self::SEQUENCE {
            steps.push(step);
            if step == Step::DeleteMessage && verify_delete {
                steps.push(Step::ConfirmDeleted);
            }
        }
        steps
    }

    /// Label used in progress output ("Testing <label>")
    pub fn label(self) -> &'static str {
        match self {
            Step::HealthCheck => "Health Check",
            Step::Register => "Registration",
            Step::Login => "Login",
            Step::CurrentUser => "Get Current User",
            Step::CreateCommunity => "Create Community",
            Step::CreateChannel => "Create Channel",
            Step::SendMessage => "Send Message",
            Step::ListMessages => "Get Messages",
            Step::AddReaction => "Add Reaction",
            Step::GetMessage => "Get Message with Reaction",
            Step::UpdateProfile => "Update Profile",
            Step::DeleteMessage => "Delete Message",
            Step::ConfirmDeleted => "Confirm Message Deleted",
            Step::ListCommunities => "List Communities",
        }
    }

    pub fn method(self) -> Method {
        match self {
            Step::Register
            | Step::Login
            | Step::CreateCommunity
            | Step::CreateChannel
            | Step::SendMessage
            | Step::AddReaction => Method::POST,
            Step::UpdateProfile => Method::PATCH,
            Step::DeleteMessage => Method::DELETE,
            Step::HealthCheck
            | Step::CurrentUser
            | Step::ListMessages
            | Step::GetMessage
            | Step::ConfirmDeleted
            | Step::ListCommunities => Method::GET,
        }
    }

    /// Path template relative to the API base URL.
    ///
    /// `HealthCheck` is the exception: it is resolved against the server root.
    pub fn path_template(self) -> &'static str {
        match self {
            Step::HealthCheck => "/health",
            Step::Register => "/auth/register",
            Step::Login => "/auth/login",
            Step::CurrentUser | Step::UpdateProfile => "/users/me",
            Step::CreateCommunity | Step::ListCommunities => "/communities",
            Step::CreateChannel => "/channels/communities/{communityId}/channels",
            Step::SendMessage | Step::ListMessages => "/messages/channels/{channelId}/messages",
            Step::GetMessage | Step::DeleteMessage | Step::ConfirmDeleted => {
                "/messages/{messageId}"
            }
            Step::AddReaction => "/messages/{messageId}/reactions",
        }
    }

    /// Whether the request carries the bearer token
    pub fn requires_auth(self) -> bool {
        !matches!(self, Step::HealthCheck | Step::Register | Step::Login)
    }

    /// The only status code accepted for this step
    pub fn expected_status(self) -> StatusCode {
        match self {
            Step::Register | Step::CreateCommunity | Step::CreateChannel | Step::SendMessage => {
                StatusCode::CREATED
            }
            Step::AddReaction | Step::DeleteMessage => StatusCode::NO_CONTENT,
            Step::ConfirmDeleted => StatusCode::NOT_FOUND,
            Step::HealthCheck
            | Step::Login
            | Step::CurrentUser
            | Step::ListMessages
            | Step::GetMessage
            | Step::UpdateProfile
            | Step::ListCommunities => StatusCode::OK,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
