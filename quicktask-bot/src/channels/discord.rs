use crate::channels::util::{preview, split_message, DISCORD_MESSAGE_LIMIT};
use crate::commands::{self, CommandContext};
use serenity::all::{ChannelId, Client, Context, EventHandler, GatewayIntents, Message, Ready};
use std::sync::Arc;
use tokio::sync::oneshot;

struct DiscordHandler {
    /// Only this Discord user id is obeyed
    authorized_user_id: String,
    commands: Arc<CommandContext>,
}

/// Bots (including ourselves) are never obeyed, whatever their id
fn is_authorized(author_id: &str, author_is_bot: bool, authorized_user_id: &str) -> bool {
    !author_is_bot && author_id == authorized_user_id
}

async fn send_reply(ctx: &Context, channel_id: ChannelId, text: &str) {
    for chunk in split_message(text, DISCORD_MESSAGE_LIMIT) {
        if let Err(e) = channel_id.say(&ctx.http, &chunk).await {
            log::error!("Discord: Failed to send message: {}", e);
        }
    }
}

#[serenity::async_trait]
impl EventHandler for DiscordHandler {
    async fn message(&self, ctx: Context, msg: Message) {
        let author_id = msg.author.id.to_string();
        if !is_authorized(&author_id, msg.author.bot, &self.authorized_user_id)
            || msg.content.is_empty()
        {
            return;
        }

        log::info!(
            "Discord: Message from {} ({}): {}",
            msg.author.name,
            author_id,
            preview(&msg.content, 80)
        );

        if let Some(reply) = commands::handle_text(&msg.content, &self.commands).await {
            send_reply(&ctx, msg.channel_id, &reply).await;
        }
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        log::info!("Discord: Bot connected as {}", ready.user.name);
    }
}

/// Run the Discord bot until `shutdown_rx` fires or the gateway connection fails
pub async fn start_discord_listener(
    bot_token: &str,
    authorized_user_id: &str,
    commands: Arc<CommandContext>,
    mut shutdown_rx: oneshot::Receiver<()>,
) -> Result<(), String> {
    log::info!("Starting Discord listener");

    // Message content is needed to read commands
    let intents = GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let handler = DiscordHandler {
        authorized_user_id: authorized_user_id.to_string(),
        commands,
    };

    let mut client = Client::builder(bot_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| format!("Failed to create Discord client: {}", e))?;

    log::info!("Discord: Client created successfully");

    let shard_manager = client.shard_manager.clone();

    tokio::select! {
        _ = &mut shutdown_rx => {
            log::info!("Discord listener received shutdown signal");
            shard_manager.shutdown_all().await;
        }
        result = client.start() => {
            match result {
                Ok(()) => log::info!("Discord listener stopped"),
                Err(e) => {
                    let error = format!("Discord client error: {}", e);
                    log::error!("{}", error);
                    return Err(error);
                }
            }
        }
    }

    Ok(())
}
