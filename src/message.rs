//! Line protocol definitions
//!
//! Plain newline-delimited text in both directions. Client lines are parsed
//! into a `Command`; every server line is built by one of the helpers below.

use crate::types::ClientId;

/// Token that starts every system line
pub const SERVER_PREFIX: &str = "server!";

/// Private reply to `/disconnect`
pub const GOODBYE: &str = "Goodbye!\n";

const NICK_COMMAND: &str = "/nick";
const DISCONNECT_COMMAND: &str = "/disconnect";

/// A message to fan out
///
/// `body` is a single newline-terminated line. `sender` is excluded from
/// delivery; `ClientId::SYSTEM` reaches every client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub sender: ClientId,
    pub body: String,
}

impl Message {
    pub fn new(sender: ClientId, body: String) -> Self {
        Self { sender, body }
    }

    /// A system line delivered to everyone
    pub fn system(text: &str) -> Self {
        Self::new(ClientId::SYSTEM, format!("{SERVER_PREFIX} {text}\n"))
    }

    /// A system line about `sender`, not echoed back to it
    pub fn notice(sender: ClientId, text: &str) -> Self {
        Self::new(sender, format!("{SERVER_PREFIX} {text}\n"))
    }

    /// A chat line from `sender` shown as `<name>> <line>`
    pub fn chat(sender: ClientId, name: &str, line: &str) -> Self {
        Self::new(sender, format!("{name}> {line}\n"))
    }

    pub fn joined(sender: ClientId, name: &str) -> Self {
        Self::notice(sender, &format!("{name} joined."))
    }

    pub fn disconnected(sender: ClientId, name: &str) -> Self {
        Self::notice(sender, &format!("{name} disconnected."))
    }

    pub fn renamed(old_name: &str, new_name: &str) -> Self {
        Self::system(&format!("{old_name} changed their nickname to {new_name}."))
    }
}

/// Parsed client input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    /// `/nick [name]`; None resets to the auto-assigned name
    Nick(Option<&'a str>),
    /// `/disconnect`
    Disconnect,
    /// Anything else
    Chat(&'a str),
}

impl<'a> Command<'a> {
    /// Parse one line (without its terminator)
    ///
    /// A command is recognised only when it is the first whitespace-separated
    /// token, so `/nickname` is chat.
    pub fn parse(line: &'a str) -> Self {
        let (token, rest) = match line.split_once(char::is_whitespace) {
            Some((token, rest)) => (token, rest),
            None => (line, ""),
        };

        match token {
            NICK_COMMAND => {
                let name = rest.trim_start();
                Command::Nick((!name.is_empty()).then_some(name))
            }
            DISCONNECT_COMMAND => Command::Disconnect,
            _ => Command::Chat(line),
        }
    }
}

/// Welcome text sent privately on connect
pub fn motd(name: &str) -> String {
    format!(
        "{p} Welcome to MediumChat.\n\
         {p} You are {name}.\n\
         {p} Commands:\n\
         {p}   - /nick [nick]: Change or reset your nickname\n\
         {p}   - /disconnect: Disconnect from the server\n",
        p = SERVER_PREFIX,
    )
}

/// Private reply when admission control refuses a connection
pub fn server_full() -> String {
    format!("{SERVER_PREFIX} Server is full.\n")
}
