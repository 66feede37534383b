use std::str::FromStr;

use ssebrot_core::{EngineMode, PanDirection};

use crate::error::AppError;

/// A pixel-space selection box, as drawn over the rendered image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl SelectionBox {
    /// The box shown before the user moves it: a tenth of the image on each
    /// axis, against the left edge and roughly centred vertically.
    pub fn default_for(img_w: u32, img_h: u32) -> Self {
        Self {
            x: 0,
            y: 9 * img_h / 20,
            width: (img_w / 10).max(1),
            height: (img_h / 10).max(1),
        }
    }

    /// A default-sized box centred on `(cx, cy)`, clamped to the top-left edges.
    pub fn centered_at(cx: u32, cy: u32, img_w: u32, img_h: u32) -> Self {
        let size = Self::default_for(img_w, img_h);
        Self {
            x: cx.saturating_sub(size.width / 2),
            y: cy.saturating_sub(size.height / 2),
            ..size
        }
    }
}

/// Where a `select` command puts its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// The default box.
    Default,
    /// A default-sized box centred on a pixel.
    At { x: u32, y: u32 },
    /// An explicit box.
    Box(SelectionBox),
}

/// One navigation or control step, named after the keys of the interactive explorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Pan(PanDirection),
    ZoomIn,
    ZoomOut,
    Undo,
    Select(Selection),
    /// Switch engine; `None` toggles.
    Mode(Option<EngineMode>),
    Reset,
}

impl FromStr for Command {
    type Err = AppError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut words = input.split_whitespace();
        let Some(head) = words.next() else {
            return Err(AppError::UnknownCommand(input.to_string()));
        };
        let args: Vec<&str> = words.collect();
        let no_args = |cmd: Command| {
            if args.is_empty() {
                Ok(cmd)
            } else {
                Err(malformed(input, "takes no arguments"))
            }
        };

        match head.to_ascii_lowercase().as_str() {
            "d" | "right" => no_args(Command::Pan(PanDirection::Right)),
            "a" | "left" => no_args(Command::Pan(PanDirection::Left)),
            "s" | "down" => no_args(Command::Pan(PanDirection::Down)),
            "w" | "up" => no_args(Command::Pan(PanDirection::Up)),
            "+" | "=" | "in" => no_args(Command::ZoomIn),
            "-" | "out" => no_args(Command::ZoomOut),
            "z" | "undo" => no_args(Command::Undo),
            "reset" => no_args(Command::Reset),
            "select" => parse_selection(input, &args).map(Command::Select),
            "mode" => match args.as_slice() {
                [] => Ok(Command::Mode(None)),
                ["scalar"] => Ok(Command::Mode(Some(EngineMode::Scalar))),
                ["vector" | "vectorized" | "sse"] => Ok(Command::Mode(Some(EngineMode::Vectorized))),
                _ => Err(malformed(input, "expected `scalar` or `vector`")),
            },
            _ => Err(AppError::UnknownCommand(input.to_string())),
        }
    }
}

fn parse_selection(input: &str, args: &[&str]) -> Result<Selection, AppError> {
    let nums = args
        .iter()
        .map(|a| a.parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| malformed(input, &format!("bad pixel coordinate: {e}")))?;

    match nums.as_slice() {
        [] => Ok(Selection::Default),
        &[x, y] => Ok(Selection::At { x, y }),
        &[x, y, width, height] => Ok(Selection::Box(SelectionBox {
            x,
            y,
            width,
            height,
        })),
        _ => Err(malformed(input, "expected `select`, `select X Y`, or `select X Y W H`")),
    }
}

fn malformed(input: &str, reason: &str) -> AppError {
    AppError::MalformedCommand {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Command {
        s.parse().unwrap()
    }

    #[test]
    fn key_letters_map_to_pans() {
        assert_eq!(parse("d"), Command::Pan(PanDirection::Right));
        assert_eq!(parse("a"), Command::Pan(PanDirection::Left));
        assert_eq!(parse("s"), Command::Pan(PanDirection::Down));
        assert_eq!(parse("w"), Command::Pan(PanDirection::Up));
        assert_eq!(parse("  LEFT "), Command::Pan(PanDirection::Left));
    }

    #[test]
    fn zoom_undo_reset() {
        assert_eq!(parse("+"), Command::ZoomIn);
        assert_eq!(parse("="), Command::ZoomIn);
        assert_eq!(parse("-"), Command::ZoomOut);
        assert_eq!(parse("z"), Command::Undo);
        assert_eq!(parse("reset"), Command::Reset);
    }

    #[test]
    fn selections() {
        assert_eq!(parse("select"), Command::Select(Selection::Default));
        assert_eq!(
            parse("select 100 50"),
            Command::Select(Selection::At { x: 100, y: 50 })
        );
        assert_eq!(
            parse("select 1 2 3 4"),
            Command::Select(Selection::Box(SelectionBox {
                x: 1,
                y: 2,
                width: 3,
                height: 4
            }))
        );
        assert!(matches!(
            "select 1 2 3".parse::<Command>(),
            Err(AppError::MalformedCommand { .. })
        ));
        assert!("select -1 2".parse::<Command>().is_err());
    }

    #[test]
    fn modes() {
        assert_eq!(parse("mode"), Command::Mode(None));
        assert_eq!(parse("mode scalar"), Command::Mode(Some(EngineMode::Scalar)));
        assert_eq!(parse("mode sse"), Command::Mode(Some(EngineMode::Vectorized)));
        assert!("mode gpu".parse::<Command>().is_err());
    }

    #[test]
    fn unknown_and_stray_arguments() {
        assert!(matches!(
            "q".parse::<Command>(),
            Err(AppError::UnknownCommand(_))
        ));
        assert!("".parse::<Command>().is_err());
        assert!(matches!(
            "d 3".parse::<Command>(),
            Err(AppError::MalformedCommand { .. })
        ));
    }

    #[test]
    fn default_box_follows_image_size() {
        let b = SelectionBox::default_for(900, 600);
        assert_eq!(
            b,
            SelectionBox {
                x: 0,
                y: 270,
                width: 90,
                height: 60
            }
        );
        let c = SelectionBox::centered_at(450, 300, 900, 600);
        assert_eq!((c.x, c.y, c.width, c.height), (405, 270, 90, 60));
        let edge = SelectionBox::centered_at(10, 10, 900, 600);
        assert_eq!((edge.x, edge.y), (0, 0));
    }
}
