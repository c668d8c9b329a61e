//! Ordered recipe instructions.
//!
//! Steps are 1-based and always contiguous: every edit renumbers the list.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Instruction {
    pub step: u32,
    pub description: String,
}

impl Instruction {
    pub fn new(step: u32, description: impl Into<String>) -> Self {
        Self {
            step,
            description: description.into(),
        }
    }
}

/// Sort by the submitted step numbers, drop blank descriptions and number the
/// rest `1..=n`.
pub fn normalize(mut steps: Vec<Instruction>) -> Vec<Instruction> {
    steps.sort_by_key(|s| s.step);
    steps.retain(|s| !s.description.trim().is_empty());
    for s in &mut steps {
        s.description = s.description.trim().to_string();
    }
    renumber(&mut steps);
    steps
}

pub fn renumber(steps: &mut [Instruction]) {
    for (i, s) in steps.iter_mut().enumerate() {
        s.step = (i + 1) as u32;
    }
}

/// Remove the step at `index` (0-based) and close the gap.
pub fn remove_step(steps: &mut Vec<Instruction>, index: usize) -> Result<Instruction, CoreError> {
    if index >= steps.len() {
        return Err(CoreError::StepOutOfRange {
            index,
            len: steps.len(),
        });
    }
    let removed = steps.remove(index);
    renumber(steps);
    Ok(removed)
}

/// Move the step at `from` to position `to` (both 0-based).
pub fn move_step(steps: &mut Vec<Instruction>, from: usize, to: usize) -> Result<(), CoreError> {
    let len = steps.len();
    for index in [from, to] {
        if index >= len {
            return Err(CoreError::StepOutOfRange { index, len });
        }
    }
    let item = steps.remove(from);
    steps.insert(to, item);
    renumber(steps);
    Ok(())
}

pub fn push_step(steps: &mut Vec<Instruction>, description: impl Into<String>) {
    steps.push(Instruction::new(0, description));
    renumber(steps);
}

/// Build steps from plain lines, one step per non-empty line.
pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<Instruction> {
    let steps = lines
        .into_iter()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .enumerate()
        .map(|(i, l)| Instruction::new((i + 1) as u32, l))
        .collect();
    normalize(steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(n: u32) -> Vec<Instruction> {
        (1..=n)
            .map(|i| Instruction::new(i, format!("step {}", i)))
            .collect()
    }

    #[test]
    fn test_normalize_sorts_and_drops_blank() {
        let input = vec![
            Instruction::new(5, "bake"),
            Instruction::new(2, "  "),
            Instruction::new(1, " mix "),
        ];
        let out = normalize(input);
        assert_eq!(
            out,
            vec![Instruction::new(1, "mix"), Instruction::new(2, "bake")]
        );
    }

    #[test]
    fn test_move_step_renumbers() {
        let mut s = steps(3);
        move_step(&mut s, 2, 0).unwrap();
        assert_eq!(s[0].description, "step 3");
        assert_eq!(s.iter().map(|i| i.step).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_move_out_of_range() {
        let mut s = steps(2);
        assert_eq!(
            move_step(&mut s, 0, 2).unwrap_err(),
            CoreError::StepOutOfRange { index: 2, len: 2 }
        );
    }

    #[test]
    fn test_push_step() {
        let mut s = steps(2);
        push_step(&mut s, "serve");
        assert_eq!(s.last().unwrap(), &Instruction::new(3, "serve"));
    }

    #[test]
    fn test_from_lines() {
        let s = from_lines("boil water\n\nadd pasta\n".lines());
        assert_eq!(
            s,
            vec![
                Instruction::new(1, "boil water"),
                Instruction::new(2, "add pasta")
            ]
        );
    }
}
