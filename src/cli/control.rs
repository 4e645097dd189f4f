use crate::daemon::{DBUS_NAME, DBUS_PATH};
use anyhow::{Context, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaemonCommand {
    Show,
    Hide,
    Stop,
}

impl DaemonCommand {
    fn method(self) -> &'static str {
        match self {
            DaemonCommand::Show => "Show",
            DaemonCommand::Hide => "Hide",
            DaemonCommand::Stop => "Stop",
        }
    }

    fn done_message(self) -> &'static str {
        match self {
            DaemonCommand::Show => "Tracking display shown",
            DaemonCommand::Hide => "Tracking display hidden",
            DaemonCommand::Stop => "Tracking display daemon stopped",
        }
    }
}

pub async fn run(command: DaemonCommand) -> Result<()> {
    let connection = zbus::Connection::session()
        .await
        .context("Failed to connect to session D-Bus")?;

    let method = command.method();
    let _reply: () = connection
        .call_method(Some(DBUS_NAME), DBUS_PATH, Some(DBUS_NAME), method, &())
        .await
        .with_context(|| format!("Failed to call {method} method - is the daemon running?"))?
        .body()
        .deserialize()
        .context("Failed to deserialize response")?;

    println!("{}", command.done_message());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_names_match_interface() {
        assert_eq!(DaemonCommand::Show.method(), "Show");
        assert_eq!(DaemonCommand::Hide.method(), "Hide");
        assert_eq!(DaemonCommand::Stop.method(), "Stop");
    }
}
