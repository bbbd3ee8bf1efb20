//! Bot command registry

/// Commands the bot accepts, with the descriptions shown by `/help`.
pub const COMMANDS: &[(&str, &str)] = &[
    ("start", "Start the bot"),
    ("help", "Get help information"),
    ("status", "Check bot status"),
    ("info", "Get information about the bot"),
    ("broadcast", "Send an announcement to the group (admins only)"),
];

/// Commands only listed administrators may invoke.
const ADMIN_COMMANDS: &[&str] = &["broadcast"];

pub fn is_known(command: &str) -> bool {
    COMMANDS.iter().any(|(name, _)| *name == command)
}

pub fn is_admin_only(command: &str) -> bool {
    ADMIN_COMMANDS.contains(&command)
}

/// The `/help` listing.
pub fn help_text() -> String {
    let mut text = String::from("Here are the commands you can use:\n\n");
    for (name, description) in COMMANDS {
        text.push_str(&format!("/{name} - {description}\n"));
    }
    text
}
