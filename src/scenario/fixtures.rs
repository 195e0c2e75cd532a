//! Payload values for one smoke run.
//!
//! Names that must be unique on the backend (username, email, community name)
//! carry a short random suffix so repeated runs against the same database do not
//! collide.

use serde::Serialize;
use uuid::Uuid;

use crate::client::models::{
    AddReactionRequest, CreateChannelRequest, CreateCommunityRequest, LoginRequest,
    RegisterRequest, SendMessageRequest, UpdateProfileRequest,
};

pub const DEFAULT_PASSWORD: &str = "StrongPassword123!";

const SUFFIX_LEN: usize = 8;

/// Every value the scenario submits, derived from one suffix
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioData {
    pub suffix: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub community_name: String,
    pub community_description: String,
    pub channel_name: String,
    pub channel_type: String,
    pub channel_topic: String,
    pub message_content: String,
    pub reaction_emoji: String,
    pub bio: String,
}

impl ScenarioData {
    /// Data with a fresh random suffix
    pub fn generate(password: impl Into<String>) -> Self {
        Self::with_suffix(random_suffix(), password)
    }

    /// Data for a fixed suffix, for reproducible names
    pub fn with_suffix(suffix: impl Into<String>, password: impl Into<String>) -> Self {
        let suffix = suffix.into();
        Self {
            username: format!("testuser_{}", suffix),
            email: format!("test_{}@example.com", suffix),
            password: password.into(),
            community_name: format!("Test Community {}", suffix),
            community_description: "A community created by E2E tests".to_string(),
            channel_name: "general".to_string(),
            channel_type: "text".to_string(),
            channel_topic: "General discussion".to_string(),
            message_content: "Hello from E2E test!".to_string(),
            reaction_emoji: "😭".to_string(),
            bio: "I am a bot for E2E testing".to_string(),
            suffix,
        }
    }

    pub fn register_request(&self) -> RegisterRequest {
        RegisterRequest {
            username: self.username.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }

    pub fn login_request(&self) -> LoginRequest {
        LoginRequest { login: self.username.clone(), password: self.password.clone() }
    }

    pub fn community_request(&self) -> CreateCommunityRequest {
        CreateCommunityRequest {
            name: self.community_name.clone(),
            description: self.community_description.clone(),
        }
    }

    pub fn channel_request(&self) -> CreateChannelRequest {
        CreateChannelRequest {
            name: self.channel_name.clone(),
            channel_type: self.channel_type.clone(),
            topic: self.channel_topic.clone(),
        }
    }

    pub fn message_request(&self) -> SendMessageRequest {
        SendMessageRequest { content: self.message_content.clone() }
    }

    pub fn reaction_request(&self) -> AddReactionRequest {
        AddReactionRequest { emoji: self.reaction_emoji.clone() }
    }

    pub fn profile_request(&self) -> UpdateProfileRequest {
        UpdateProfileRequest { bio: Some(self.bio.clone()), ..Default::default() }
    }
}

/// First eight hex digits of a random v4 UUID
pub fn random_suffix() -> String {
    let mut suffix = Uuid::new_v4().simple().to_string();
    suffix.truncate(SUFFIX_LEN);
    suffix
}

/// Check a user-supplied suffix: non-empty ASCII alphanumerics only
pub fn validate_suffix(suffix: &str) -> Result<(), String> {
    if suffix.is_empty() {
        return Err("suffix must not be empty".to_string());
    }
    if !suffix.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(format!("suffix '{}' must contain only ASCII letters and digits", suffix));
    }
    Ok(())
}
