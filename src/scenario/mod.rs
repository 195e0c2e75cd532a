//! # Smoke Scenario
//!
//! Drives the fixed happy-path sequence against a running backend:
//!
//! ```text
//! register → login → me → community → channel → send → list → react
//!          → fetch (reaction check) → bio patch → delete → list communities
//! ```
//!
//! Each step issues one request, waits for the full response and checks it before
//! the next step starts. The first failure ends the run with a [`SmokeError`];
//! nothing is retried and nothing created along the way is cleaned up.

pub mod fixtures;
pub mod report;
pub mod step;

use std::fmt::Display;
use std::future::Future;
use std::time::Instant;

use chrono::Utc;
use owo_colors::OwoColorize;
use tracing::{debug, info, warn};

use crate::client::models::{AuthPayload, Channel, Community, HealthStatus, Message, User};
use crate::client::{ApiResponse, ZentraClient};
use crate::errors::{Result, SmokeError};

pub use fixtures::ScenarioData;
pub use report::{RunReport, StepOutcome};
pub use step::Step;

/// Optional behaviour around the fixed sequence
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Probe `/health` before registering
    pub preflight: bool,
    /// Re-fetch the deleted message and require a 404
    pub verify_delete: bool,
    /// Print `Testing ...` / `SUCCESS: ...` lines to stdout
    pub echo_progress: bool,
}

/// Progress output and per-step outcomes of a run in flight
struct Journal {
    echo: bool,
    outcomes: Vec<StepOutcome>,
}

impl Journal {
    fn new(echo: bool) -> Self {
        Self { echo, outcomes: Vec::new() }
    }

    fn say(&self, line: impl Display) {
        if self.echo {
            println!("{}", line);
        }
    }

    fn testing(&self, what: impl Display) {
        self.say(format_args!("Testing {}", what));
    }

    fn success(&self, what: impl Display) {
        if self.echo {
            println!("{} {}", "SUCCESS:".green().bold(), what);
        }
    }

    /// Await one request and hold it to the step's expected status
    async fn exchange<F>(&mut self, step: Step, request: F) -> Result<ApiResponse>
    where
        F: Future<Output = reqwest::Result<ApiResponse>>,
    {
        let started = Instant::now();
        let response = request.await.map_err(|source| SmokeError::Transport { step, source })?;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let response = response.expect_status(step)?;
        debug!(step = %step, status = %response.status(), elapsed_ms, "Step exchange passed");

        self.outcomes.push(StepOutcome {
            step,
            method: step.method().to_string(),
            status: response.status().as_u16(),
            elapsed_ms,
        });
        Ok(response)
    }
}

/// An identifier read from a response must be a non-empty string
fn require_id(step: Step, what: &str, id: String) -> Result<String> {
    if id.trim().is_empty() {
        return Err(SmokeError::assertion(step, format!("{} is empty", what)));
    }
    Ok(id)
}

/// The health body must report `"ok"`
fn read_health(response: &ApiResponse) -> Result<HealthStatus> {
    let step = Step::HealthCheck;
    let health: HealthStatus = response.json(step)?;
    if health.status != "ok" {
        return Err(SmokeError::assertion(
            step,
            format!("backend reports status '{}'", health.status),
        ));
    }
    Ok(health)
}

/// Probe the backend's `/health` endpoint outside of a full run
pub async fn probe_health(client: &ZentraClient) -> Result<HealthStatus> {
    let step = Step::HealthCheck;
    let response =
        client.health().await.map_err(|source| SmokeError::Transport { step, source })?;
    read_health(&response.expect_status(step)?)
}

/// Runs the smoke scenario once
pub struct SmokeRunner {
    client: ZentraClient,
    data: ScenarioData,
    options: RunOptions,
}

impl SmokeRunner {
    /// `client` must be unauthenticated; the runner derives the bearer view itself
    pub fn new(client: ZentraClient, data: ScenarioData, options: RunOptions) -> Self {
        Self { client, data, options }
    }

    pub fn data(&self) -> &ScenarioData {
        &self.data
    }

    /// The steps this runner will execute, in order
    pub fn plan(&self) -> Vec<Step> {
        Step::plan(self.options.preflight, self.options.verify_delete)
    }

    pub async fn run(&self) -> Result<RunReport> {
        let started_at = Utc::now();
        let clock = Instant::now();
        let mut journal = Journal::new(self.options.echo_progress);

        info!(
            base_url = %self.client.base_url(),
            username = %self.data.username,
            steps = self.plan().len(),
            "Starting smoke run"
        );
        journal.say("Starting E2E API tests...");

        if self.options.preflight {
            self.health_check(&mut journal).await?;
        }

        let token = self.register(&mut journal).await?;
        let api = self.client.authenticated(&token);

        self.login(&mut journal).await?;
        self.current_user(&mut journal, &api).await?;

        let community_id = self.create_community(&mut journal, &api).await?;
        let channel_id = self.create_channel(&mut journal, &api, &community_id).await?;
        let sent_message_id = self.send_message(&mut journal, &api, &channel_id).await?;
        let (message_id, messages_listed) =
            self.list_messages(&mut journal, &api, &channel_id, &sent_message_id).await?;

        self.add_reaction(&mut journal, &api, &message_id).await?;
        self.verify_reaction(&mut journal, &api, &message_id).await?;
        self.update_profile(&mut journal, &api).await?;
        self.delete_message(&mut journal, &api, &message_id).await?;

        if self.options.verify_delete {
            self.confirm_deleted(&mut journal, &api, &message_id).await?;
        }

        let communities_listed = self.list_communities(&mut journal, &api, &community_id).await?;

        let elapsed_ms = u64::try_from(clock.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(elapsed_ms, steps = journal.outcomes.len(), "Smoke run passed");

        Ok(RunReport {
            base_url: self.client.base_url().to_string(),
            username: self.data.username.clone(),
            community_id,
            channel_id,
            sent_message_id,
            message_id,
            messages_listed,
            communities_listed,
            started_at,
            elapsed_ms,
            steps: journal.outcomes,
        })
    }

    async fn health_check(&self, journal: &mut Journal) -> Result<()> {
        let step = Step::HealthCheck;
        journal.testing(format_args!("{}: {}", step, self.client.health_url()));

        let response = journal.exchange(step, self.client.health()).await?;
        read_health(&response)?;

        journal.success("Backend is healthy");
        Ok(())
    }

    async fn register(&self, journal: &mut Journal) -> Result<String> {
        let step = Step::Register;
        journal.testing(format_args!("{}: {}", step, self.data.username));

        let request = self.data.register_request();
        let response = journal.exchange(step, self.client.register(&request)).await?;
        let auth: AuthPayload = response.data(step)?;
        let token = require_id(step, "access token", auth.access_token)?;

        journal.success("Registration successful");
        Ok(token)
    }

    async fn login(&self, journal: &mut Journal) -> Result<()> {
        let step = Step::Login;
        journal.testing(step);

        let request = self.data.login_request();
        journal.exchange(step, self.client.login(&request)).await?;

        journal.success("Login successful");
        Ok(())
    }

    async fn current_user(&self, journal: &mut Journal, api: &ZentraClient) -> Result<()> {
        let step = Step::CurrentUser;
        journal.testing(step);

        let response = journal.exchange(step, api.current_user()).await?;
        let user: User = response.data(step)?;
        if user.username != self.data.username {
            return Err(SmokeError::assertion(
                step,
                format!("expected username '{}', got '{}'", self.data.username, user.username),
            ));
        }

        journal.success(format_args!("Retrieved user {}", user.username));
        Ok(())
    }

    async fn create_community(&self, journal: &mut Journal, api: &ZentraClient) -> Result<String> {
        let step = Step::CreateCommunity;
        journal.testing(step);

        let request = self.data.community_request();
        let response = journal.exchange(step, api.create_community(&request)).await?;
        let community: Community = response.data(step)?;
        let community_id = require_id(step, "community id", community.id)?;

        journal.success(format_args!("Created community {}", community_id));
        Ok(community_id)
    }

    async fn create_channel(
        &self,
        journal: &mut Journal,
        api: &ZentraClient,
        community_id: &str,
    ) -> Result<String> {
        let step = Step::CreateChannel;
        journal.testing(step);

        let request = self.data.channel_request();
        let response = journal.exchange(step, api.create_channel(community_id, &request)).await?;
        let channel: Channel = response.data(step)?;
        let channel_id = require_id(step, "channel id", channel.id)?;

        journal.success(format_args!("Created channel {}", channel_id));
        Ok(channel_id)
    }

    async fn send_message(
        &self,
        journal: &mut Journal,
        api: &ZentraClient,
        channel_id: &str,
    ) -> Result<String> {
        let step = Step::SendMessage;
        journal.testing(step);

        let request = self.data.message_request();
        let response = journal.exchange(step, api.send_message(channel_id, &request)).await?;
        let message: Message = response.data(step)?;
        let message_id = require_id(step, "message id", message.id)?;

        journal.success(format_args!("Sent message {}", message_id));
        Ok(message_id)
    }

    /// Returns the first listed message id and the number of messages listed
    async fn list_messages(
        &self,
        journal: &mut Journal,
        api: &ZentraClient,
        channel_id: &str,
        sent_message_id: &str,
    ) -> Result<(String, usize)> {
        let step = Step::ListMessages;
        journal.testing(step);

        let response = journal.exchange(step, api.list_messages(channel_id)).await?;
        let messages: Vec<Message> = response.data(step)?;
        let count = messages.len();
        let first = messages
            .into_iter()
            .next()
            .ok_or_else(|| SmokeError::assertion(step, "message list is empty"))?;
        let message_id = require_id(step, "listed message id", first.id)?;

        if message_id != sent_message_id {
            warn!(
                sent = %sent_message_id,
                listed = %message_id,
                "First listed message differs from the message just sent; continuing with the listed one"
            );
        }

        journal.success(format_args!("Retrieved {} messages", count));
        Ok((message_id, count))
    }

    async fn add_reaction(
        &self,
        journal: &mut Journal,
        api: &ZentraClient,
        message_id: &str,
    ) -> Result<()> {
        let step = Step::AddReaction;
        journal.testing(step);

        let request = self.data.reaction_request();
        journal.exchange(step, api.add_reaction(message_id, &request)).await?;

        journal.success("Added reaction");
        Ok(())
    }

    async fn verify_reaction(
        &self,
        journal: &mut Journal,
        api: &ZentraClient,
        message_id: &str,
    ) -> Result<()> {
        let step = Step::GetMessage;
        journal.testing(step);

        let response = journal.exchange(step, api.get_message(message_id)).await?;
        let message: Message = response.data(step)?;

        match message.reactions.as_slice() {
            [reaction] if reaction.emoji == self.data.reaction_emoji => {}
            [reaction] => {
                return Err(SmokeError::assertion(
                    step,
                    format!(
                        "expected reaction '{}', got '{}'",
                        self.data.reaction_emoji, reaction.emoji
                    ),
                ));
            }
            reactions => {
                return Err(SmokeError::assertion(
                    step,
                    format!("expected exactly 1 reaction, found {}", reactions.len()),
                ));
            }
        }

        journal.success("Verified reaction in message data");
        Ok(())
    }

    async fn update_profile(&self, journal: &mut Journal, api: &ZentraClient) -> Result<()> {
        let step = Step::UpdateProfile;
        journal.testing(step);

        let request = self.data.profile_request();
        journal.exchange(step, api.update_current_user(&request)).await?;

        journal.success("Updated profile bio");
        Ok(())
    }

    async fn delete_message(
        &self,
        journal: &mut Journal,
        api: &ZentraClient,
        message_id: &str,
    ) -> Result<()> {
        let step = Step::DeleteMessage;
        journal.testing(step);

        journal.exchange(step, api.delete_message(message_id)).await?;

        journal.success(format_args!("Deleted message {}", message_id));
        Ok(())
    }

    async fn confirm_deleted(
        &self,
        journal: &mut Journal,
        api: &ZentraClient,
        message_id: &str,
    ) -> Result<()> {
        let step = Step::ConfirmDeleted;
        journal.testing(step);

        journal.exchange(step, api.get_message(message_id)).await?;

        journal.success(format_args!("Message {} is no longer retrievable", message_id));
        Ok(())
    }

    /// Returns the number of communities listed
    async fn list_communities(
        &self,
        journal: &mut Journal,
        api: &ZentraClient,
        community_id: &str,
    ) -> Result<usize> {
        let step = Step::ListCommunities;
        journal.testing(step);

        let response = journal.exchange(step, api.list_communities()).await?;
        let communities: Vec<Community> = response.data(step)?;
        if communities.is_empty() {
            return Err(SmokeError::assertion(step, "community list is empty"));
        }
        if !communities.iter().any(|community| community.id == community_id) {
            return Err(SmokeError::assertion(
                step,
                format!(
                    "created community {} missing from {} listed communities",
                    community_id,
                    communities.len()
                ),
            ));
        }

        journal.success(format_args!("Found {} communities", communities.len()));
        Ok(communities.len())
    }
}
