use anyhow::Context as _;
use poise::{FrameworkOptions, PrefixFrameworkOptions};
use serenity::all::{Context, CreateAttachment, CreateMessage, FullEvent, Message};
use tracing::{debug, error, info_span};
use tracing_futures::Instrument;

use crate::{
    Data, Error,
    command::{self, Caller, Command, Invocation, Reply, router},
};

/// Framework options with message events routed to [`on_message`].
///
/// poise's own mention-prefix parsing is off: commands are matched here, and
/// leaving it on makes poise warn about every command it doesn't know.
pub fn framework_options() -> FrameworkOptions<Data, Error> {
    FrameworkOptions {
        event_handler: |serenity_ctx, event, _framework_ctx, data| {
            Box::pin(async move {
                if let FullEvent::Message { new_message } = event
                    && let Err(e) = on_message(serenity_ctx, data, new_message).await
                {
                    error!(message_id = %new_message.id, "message handling failed: {e:?}");
                }
                Ok(())
            })
        },
        prefix_options: PrefixFrameworkOptions {
            mention_as_prefix: false,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Entry point for every message the gateway delivers.
pub async fn on_message(ctx: &Context, data: &Data, msg: &Message) -> Result<(), Error> {
    let Some(invocation) = addressed(msg.author.bot, &msg.content, &data.mention) else {
        return Ok(());
    };

    let span = info_span!(
        "command",
        command = %invocation.name,
        message_id = %msg.id,
        user_id = %msg.author.id
    );

    handle(ctx, data, msg, invocation).instrument(span).await
}

async fn handle(
    ctx: &Context,
    data: &Data,
    msg: &Message,
    invocation: Invocation,
) -> Result<(), Error> {
    debug!(args = ?invocation.args, "received");

    let needs_roles = Command::from_name(&invocation.name).is_some_and(Command::requires_role);
    let roles = if needs_roles {
        member_role_names(ctx, msg).await?
    } else {
        Vec::new()
    };

    let caller = Caller {
        user_id: msg.author.id.get(),
        roles,
    };

    let Some(reply) = command::respond(data, &invocation, &caller).await? else {
        return Ok(());
    };

    send_reply(ctx, msg, reply).await
}

/// The invocation in `content`, if it is meant for the bot. Automated
/// authors, the bot itself included, are never answered.
fn addressed(author_is_bot: bool, content: &str, mention: &str) -> Option<Invocation> {
    if author_is_bot {
        return None;
    }
    router::parse(content, mention)
}

/// Names of the author's roles in the guild the message came from.
/// Direct messages have none.
async fn member_role_names(ctx: &Context, msg: &Message) -> Result<Vec<String>, Error> {
    let (Some(guild_id), Some(member)) = (msg.guild_id, msg.member.as_ref()) else {
        return Ok(Vec::new());
    };

    let guild_roles = guild_id
        .roles(ctx)
        .await
        .with_context(|| format!("fetch roles for guild {guild_id}"))?;

    Ok(member
        .roles
        .iter()
        .filter_map(|id| guild_roles.get(id))
        .map(|role| role.name.clone())
        .collect())
}

async fn send_reply(ctx: &Context, msg: &Message, reply: Reply) -> Result<(), Error> {
    let mut message = CreateMessage::new()
        .content(reply.content)
        .reference_message(msg);

    if let Some(file) = reply.file {
        debug!(file = %file.name, bytes = file.bytes.len(), "attaching file");
        message = message.add_file(CreateAttachment::bytes(file.bytes, file.name));
    }

    msg.channel_id.send_message(ctx, message).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MENTION: &str = "<@42>";

    #[test]
    fn poise_does_not_parse_mentions() {
        let options = framework_options();
        assert!(!options.prefix_options.mention_as_prefix);
        assert!(options.prefix_options.prefix.is_none());
        assert!(options.commands.is_empty());
    }

    #[test]
    fn bots_are_ignored_whatever_they_say() {
        assert_eq!(addressed(true, "<@42> help", MENTION), None);
        assert_eq!(addressed(true, "<@42> download", MENTION), None);
    }

    #[test]
    fn humans_must_mention_first() {
        assert_eq!(addressed(false, "help", MENTION), None);
        assert_eq!(addressed(false, "help <@42>", MENTION), None);

        let inv = addressed(false, "<@42> Count", MENTION).unwrap();
        assert_eq!(inv.name, "count");
    }
}
