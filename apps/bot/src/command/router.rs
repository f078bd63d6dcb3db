/// A command addressed to the bot: lowercased name plus positional args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub name: String,
    pub args: Vec<String>,
}

/// Split `content` into an [`Invocation`] if it starts with `mention`.
///
/// Returns `None` for messages not addressed to the bot and for a bare
/// mention with nothing after it.
pub fn parse(content: &str, mention: &str) -> Option<Invocation> {
    let rest = content.strip_prefix(mention)?;
    let mut tokens = rest.split_whitespace();
    let name = tokens.next()?.to_lowercase();

    Some(Invocation {
        name,
        args: tokens.map(str::to_string).collect(),
    })
}
