use super::CommandSender;
use crate::commands::error::{CommandResult, RuntimeError};

pub struct CommandContext<'a> {
    sender: &'a CommandSender,
    input: &'a str,
    arguments: Vec<(String, String)>,
}

impl<'a> CommandContext<'a> {
    pub fn new(sender: &'a CommandSender, input: &'a str) -> Self {
        Self {
            sender,
            input,
            arguments: Vec::new(),
        }
    }

    pub fn with_argument(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.arguments.push((name.into(), value.into()));
        self
    }

    pub fn sender(&self) -> &CommandSender {
        self.sender
    }

    pub fn input(&self) -> &str {
        self.input
    }

    pub fn argument(&self, name: &str) -> CommandResult<&str> {
        self.arguments
            .iter()
            .find(|(arg_name, _)| arg_name == name)
            .map(|(_, value)| value.as_str())
            .ok_or_else(|| {
                RuntimeError::MissingArgument {
                    name: name.to_string(),
                }
                .into()
            })
    }

    pub fn require_permission(&self, permission: &str) -> CommandResult<()> {
        if !self.sender.has_permission(permission) {
            return Err(RuntimeError::PermissionDenied {
                permission: permission.to_string(),
            }
            .into());
        }
        Ok(())
    }

    pub fn player_name(&self) -> CommandResult<&str> {
        match self.sender {
            CommandSender::Player { name, .. } => Ok(name.as_str()),
            CommandSender::Console => Err(RuntimeError::PlayerOnly.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::error::CommandError;

    #[test]
    fn arguments_and_sender() {
        let player = CommandSender::player("Steve", ["tell.use"]);
        let ctx = CommandContext::new(&player, "tell Alex").with_argument("players", "Alex");

        assert_eq!(ctx.input(), "tell Alex");
        assert_eq!(ctx.argument("players").unwrap(), "Alex");
        assert!(matches!(
            ctx.argument("message"),
            Err(CommandError::Runtime(RuntimeError::MissingArgument { .. }))
        ));
        assert_eq!(ctx.player_name().unwrap(), "Steve");
        assert!(ctx.require_permission("tell.use").is_ok());
        assert!(ctx.require_permission("op").is_err());
    }

    #[test]
    fn console_is_not_a_player() {
        let console = CommandSender::Console;
        let ctx = CommandContext::new(&console, "stop");
        assert!(matches!(
            ctx.player_name(),
            Err(CommandError::Runtime(RuntimeError::PlayerOnly))
        ));
        assert!(ctx.require_permission("op").is_ok());
        assert!(ctx.sender().has_permission("anything"));
    }
}
