use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq)]
pub enum ArgumentType {
    String,
    GreedyString,
    Integer { min: i32, max: i32 },
    Float { min: f32, max: f32 },
    Boolean,
    Player,
    Vec3,
    BlockPos,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgumentTypeError {
    #[error("unknown argument type '{0}'")]
    Unknown(String),
    #[error("invalid bounds '{0}'")]
    Bounds(String),
}

impl ArgumentType {
    pub fn string() -> Self {
        ArgumentType::String
    }

    pub fn greedy_string() -> Self {
        ArgumentType::GreedyString
    }

    pub fn integer(min: i32, max: i32) -> Self {
        ArgumentType::Integer { min, max }
    }

    pub fn float(min: f32, max: f32) -> Self {
        ArgumentType::Float { min, max }
    }

    pub fn boolean() -> Self {
        ArgumentType::Boolean
    }

    pub fn player() -> Self {
        ArgumentType::Player
    }

    pub fn vec3() -> Self {
        ArgumentType::Vec3
    }

    pub fn block_pos() -> Self {
        ArgumentType::BlockPos
    }

    pub fn is_greedy(&self) -> bool {
        matches!(self, ArgumentType::GreedyString)
    }
}

fn bounds<T: FromStr + PartialOrd>(args: &str) -> Result<(T, T), ArgumentTypeError> {
    let error = || ArgumentTypeError::Bounds(args.to_string());
    let (min, max) = args.split_once(',').ok_or_else(error)?;
    let min: T = min.trim().parse().map_err(|_| error())?;
    let max: T = max.trim().parse().map_err(|_| error())?;
    // Also rejects NaN, which compares unordered.
    if min.partial_cmp(&max).is_none_or(|ordering| ordering.is_gt()) {
        return Err(error());
    }
    Ok((min, max))
}

/// Parses `integer`, `integer(0, 10)`, `float(-1.5, 1.5)`, `player`, ...
impl FromStr for ArgumentType {
    type Err = ArgumentTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, args) = match s.split_once('(') {
            Some((name, rest)) => {
                let args = rest
                    .strip_suffix(')')
                    .ok_or_else(|| ArgumentTypeError::Bounds(rest.to_string()))?;
                (name.trim(), Some(args))
            }
            None => (s, None),
        };

        let ty = match (name, args) {
            ("string" | "word", None) => ArgumentType::String,
            ("greedy_string" | "greedy", None) => ArgumentType::GreedyString,
            ("integer", None) => ArgumentType::integer(i32::MIN, i32::MAX),
            ("integer", Some(args)) => {
                let (min, max) = bounds(args)?;
                ArgumentType::integer(min, max)
            }
            ("float", None) => ArgumentType::float(f32::MIN, f32::MAX),
            ("float", Some(args)) => {
                let (min, max) = bounds(args)?;
                ArgumentType::float(min, max)
            }
            ("boolean", None) => ArgumentType::Boolean,
            ("player", None) => ArgumentType::Player,
            ("vec3", None) => ArgumentType::Vec3,
            ("block_pos", None) => ArgumentType::BlockPos,
            _ => return Err(ArgumentTypeError::Unknown(s.to_string())),
        };
        Ok(ty)
    }
}

impl fmt::Display for ArgumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentType::String => write!(f, "string"),
            ArgumentType::GreedyString => write!(f, "greedy_string"),
            ArgumentType::Integer { min, max } if (*min, *max) == (i32::MIN, i32::MAX) => {
                write!(f, "integer")
            }
            ArgumentType::Integer { min, max } => write!(f, "integer({}, {})", min, max),
            ArgumentType::Float { min, max } if (*min, *max) == (f32::MIN, f32::MAX) => {
                write!(f, "float")
            }
            ArgumentType::Float { min, max } => write!(f, "float({}, {})", min, max),
            ArgumentType::Boolean => write!(f, "boolean"),
            ArgumentType::Player => write!(f, "player"),
            ArgumentType::Vec3 => write!(f, "vec3"),
            ArgumentType::BlockPos => write!(f, "block_pos"),
        }
    }
}
