/// Text commands for driving the panel from a prompt
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{alpha1, multispace0, multispace1},
    combinator::{all_consuming, map, map_res},
    number::complete::float,
    sequence::{delimited, preceded, tuple},
    IResult,
};
use thiserror::Error;

use crate::descriptor::{ParamError, ShapeKind};
use crate::panel::Panel;
use crate::scene::Scene;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `set <path> <number>`
    Set { path: String, value: f32 },
    /// `toggle <path>`
    Toggle { path: String },
    /// `reset <shape>`
    Reset { shape: ShapeKind },
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("could not parse `{0}` (try `set cube.width 4`, `toggle sphere.visible` or `reset icosahedron`)")]
    Parse(String),
    #[error(transparent)]
    Param(#[from] ParamError),
}

/// Parse one command line
pub fn parse_command(input: &str) -> Result<Command, CommandError> {
    match all_consuming(delimited(multispace0, command, multispace0))(input) {
        Ok((_, command)) => Ok(command),
        Err(_) => Err(CommandError::Parse(input.trim().to_string())),
    }
}

fn command(input: &str) -> IResult<&str, Command> {
    alt((set_command, toggle_command, reset_command))(input)
}

fn set_command(input: &str) -> IResult<&str, Command> {
    map(
        tuple((
            tag("set"),
            preceded(multispace1, control_path),
            preceded(multispace1, float),
        )),
        |(_, path, value)| Command::Set {
            path: path.to_string(),
            value,
        },
    )(input)
}

fn toggle_command(input: &str) -> IResult<&str, Command> {
    map(
        preceded(tag("toggle"), preceded(multispace1, control_path)),
        |path| Command::Toggle {
            path: path.to_string(),
        },
    )(input)
}

fn reset_command(input: &str) -> IResult<&str, Command> {
    map(
        preceded(
            tag("reset"),
            preceded(multispace1, map_res(alpha1, str::parse::<ShapeKind>)),
        ),
        |shape| Command::Reset { shape },
    )(input)
}

fn control_path(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '.' || c == '_')(input)
}

impl Command {
    /// Run the command against the scene through the panel's bindings
    pub fn execute(&self, panel: &Panel, scene: &mut Scene) -> Result<String, CommandError> {
        let message = match self {
            Command::Set { path, value } => {
                let applied = panel.apply(scene, path, *value)?;
                format!("{path} = {applied}")
            }
            Command::Toggle { path } => {
                let state = panel.toggle(scene, path)?;
                format!("{path} = {state}")
            }
            Command::Reset { shape } => {
                scene.reset_params(*shape);
                format!("{shape} reset")
            }
        };
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set() {
        assert_eq!(
            parse_command("  set cube.widthSegments 12 "),
            Ok(Command::Set {
                path: "cube.widthSegments".to_string(),
                value: 12.0
            })
        );
        assert_eq!(
            parse_command("set sphere.rotation.x -0.5"),
            Ok(Command::Set {
                path: "sphere.rotation.x".to_string(),
                value: -0.5
            })
        );
    }

    #[test]
    fn test_parse_toggle_and_reset() {
        assert_eq!(
            parse_command("toggle icosahedron.visible"),
            Ok(Command::Toggle {
                path: "icosahedron.visible".to_string()
            })
        );
        assert_eq!(
            parse_command("reset sphere"),
            Ok(Command::Reset {
                shape: ShapeKind::Sphere
            })
        );
    }

    #[test]
    fn test_parse_failures() {
        for line in ["", "set cube.width", "set cube.width four", "reset torus", "settle 1", "toggle"] {
            assert!(
                matches!(parse_command(line), Err(CommandError::Parse(_))),
                "{line:?} should not parse"
            );
        }
    }

    #[test]
    fn test_execute_goes_through_the_panel() {
        let panel = Panel::new();
        let mut scene = Scene::new();

        let message = parse_command("set cube.depth 45")
            .unwrap()
            .execute(&panel, &mut scene)
            .unwrap();
        assert_eq!(message, "cube.depth = 30");
        assert_eq!(scene.shape(ShapeKind::Cube).params().get("depth"), Some(30.0));

        let err = parse_command("toggle cube.depth")
            .unwrap()
            .execute(&panel, &mut scene)
            .unwrap_err();
        assert_eq!(
            err,
            CommandError::Param(ParamError::NotToggle("cube.depth".to_string()))
        );

        parse_command("reset cube")
            .unwrap()
            .execute(&panel, &mut scene)
            .unwrap();
        assert_eq!(scene.shape(ShapeKind::Cube).params().get("depth"), Some(1.0));
    }
}
