//! Instruction step editing for `ladle recipes steps`.
//!
//! Step numbers on the command line are 1-based, as shown in listings.

use anyhow::{bail, Result};
use clap::Subcommand;
use ladle_client::LadleClient;
use ladle_core::instructions::{move_step, push_step, remove_step, Instruction};
use ladle_core::{Recipe, UpdateRecipeRequest};

#[derive(Subcommand)]
pub enum StepAction {
    /// Print the steps
    List,
    /// Append a step
    Add { text: String },
    /// Remove a step
    Remove { step: usize },
    /// Move a step to another position
    Move { from: usize, to: usize },
}

fn index(step: usize) -> Result<usize> {
    match step.checked_sub(1) {
        Some(i) => Ok(i),
        None => bail!("Steps are numbered from 1"),
    }
}

/// Apply an edit to a copy of the steps. `None` means nothing changed.
pub fn edit(steps: &[Instruction], action: &StepAction) -> Result<Option<Vec<Instruction>>> {
    let mut steps = steps.to_vec();
    match action {
        StepAction::List => return Ok(None),
        StepAction::Add { text } => {
            if text.trim().is_empty() {
                bail!("Step text cannot be empty");
            }
            push_step(&mut steps, text.trim());
        }
        StepAction::Remove { step } => {
            remove_step(&mut steps, index(*step)?)?;
        }
        StepAction::Move { from, to } => {
            move_step(&mut steps, index(*from)?, index(*to)?)?;
        }
    }
    Ok(Some(steps))
}

pub fn print(steps: &[Instruction]) {
    if steps.is_empty() {
        println!("(no steps)");
    }
    for s in steps {
        println!("{:>3}. {}", s.step, s.description);
    }
}

pub async fn run(client: &LadleClient, recipe: Recipe, action: StepAction) -> Result<()> {
    let Some(steps) = edit(&recipe.instructions, &action)? else {
        print(&recipe.instructions);
        return Ok(());
    };

    let request = UpdateRecipeRequest {
        instructions: Some(steps),
        ..UpdateRecipeRequest::default()
    };
    let updated = client.update_recipe(recipe.id, &request).await?;
    print(&updated.instructions);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps() -> Vec<Instruction> {
        ["boil", "drain", "serve"]
            .iter()
            .enumerate()
            .map(|(i, d)| Instruction::new(i as u32 + 1, *d))
            .collect()
    }

    fn descriptions(steps: &[Instruction]) -> Vec<&str> {
        steps.iter().map(|s| s.description.as_str()).collect()
    }

    #[test]
    fn test_remove_renumbers() {
        let edited = edit(&steps(), &StepAction::Remove { step: 2 }).unwrap().unwrap();
        assert_eq!(descriptions(&edited), vec!["boil", "serve"]);
        assert_eq!(edited[1].step, 2);
    }

    #[test]
    fn test_move_uses_one_based_positions() {
        let edited = edit(&steps(), &StepAction::Move { from: 3, to: 1 })
            .unwrap()
            .unwrap();
        assert_eq!(descriptions(&edited), vec!["serve", "boil", "drain"]);
    }

    #[test]
    fn test_step_zero_rejected() {
        assert!(edit(&steps(), &StepAction::Remove { step: 0 }).is_err());
        assert!(edit(&steps(), &StepAction::Remove { step: 4 }).is_err());
    }

    #[test]
    fn test_list_changes_nothing() {
        assert!(edit(&steps(), &StepAction::List).unwrap().is_none());
    }
}
