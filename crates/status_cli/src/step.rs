//! Mutation steps for `statusext simulate`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Host entry point a step goes through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
	Set,
	Add,
	Sub,
}

impl fmt::Display for Op {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Set => "set",
			Self::Add => "add",
			Self::Sub => "sub",
		})
	}
}

/// One `op:NAME:VALUE` mutation.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
	pub op: Op,
	pub name: String,
	pub value: f32,
}

#[derive(Debug, Error, PartialEq)]
pub enum StepError {
	#[error("expected OP:NAME:VALUE, got {0:?}")]
	Shape(String),
	#[error("unknown operation {0:?} (expected set, add or sub)")]
	Op(String),
	#[error("invalid value {0:?}")]
	Value(String),
	#[error("empty channel name")]
	EmptyName,
}

impl FromStr for Step {
	type Err = StepError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let (op, rest) = s.split_once(':').ok_or_else(|| StepError::Shape(s.to_owned()))?;
		let (name, value) = rest.rsplit_once(':').ok_or_else(|| StepError::Shape(s.to_owned()))?;

		let op = match op.trim().to_ascii_lowercase().as_str() {
			"set" => Op::Set,
			"add" => Op::Add,
			"sub" | "subtract" => Op::Sub,
			_ => return Err(StepError::Op(op.to_owned())),
		};
		let name = name.trim();
		if name.is_empty() {
			return Err(StepError::EmptyName);
		}
		let value = value
			.trim()
			.parse::<f32>()
			.map_err(|_| StepError::Value(value.to_owned()))?;

		Ok(Self {
			op,
			name: name.to_owned(),
			value,
		})
	}
}

impl fmt::Display for Step {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}:{}", self.op, self.name, self.value)
	}
}
