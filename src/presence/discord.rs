//! Discord IPC transport.
//!
//! Thin wrapper over `discord-rich-presence`, translating our payload into
//! the library's activity builder. The activity type is `Listening` so the
//! presence reads "Listening to ..." instead of "Playing ...".

use discord_rich_presence::activity::{Activity, ActivityType, Assets, Timestamps};
use discord_rich_presence::{DiscordIpc, DiscordIpcClient};

use super::{ActivityPayload, PresenceClient, PresenceError};

/// Discord IPC socket connection.
pub struct DiscordPresence {
    client: DiscordIpcClient,
}

impl DiscordPresence {
    pub fn new(application_id: &str) -> Result<Self, PresenceError> {
        let client = DiscordIpcClient::new(application_id)
            .map_err(|e| PresenceError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

impl PresenceClient for DiscordPresence {
    fn connect(&mut self) -> Result<(), PresenceError> {
        self.client
            .connect()
            .map_err(|e| PresenceError::Client(e.to_string()))
    }

    fn set_activity(&mut self, payload: &ActivityPayload) -> Result<(), PresenceError> {
        let activity = Activity::new()
            .activity_type(ActivityType::Listening)
            .details(&payload.details)
            .state(&payload.state)
            .timestamps(Timestamps::new().start(payload.start).end(payload.end))
            .assets(
                Assets::new()
                    .large_image(&payload.large_image)
                    .large_text(&payload.large_text)
                    .small_image(&payload.small_image)
                    .small_text(&payload.small_text),
            );

        self.client
            .set_activity(activity)
            .map_err(|e| PresenceError::Client(e.to_string()))
    }

    fn clear_activity(&mut self) -> Result<(), PresenceError> {
        self.client
            .clear_activity()
            .map_err(|e| PresenceError::Client(e.to_string()))
    }
}
