//! Behavior the UI layers rely on: image URL resolution and instruction
//! editing.

use ladle_core::instructions::{remove_step, Instruction};
use ladle_core::{fallback_image_url, resolve_image_url, PLACEHOLDER_IMAGE};

#[test]
fn missing_image_uses_placeholder() {
    assert_eq!(resolve_image_url("http://api", None), PLACEHOLDER_IMAGE);
    assert_eq!(resolve_image_url("http://api", Some("")), PLACEHOLDER_IMAGE);
}

#[test]
fn absolute_image_passes_through() {
    assert_eq!(
        resolve_image_url("http://api", Some("http://x/y.jpg")),
        "http://x/y.jpg"
    );
}

#[test]
fn relative_image_gets_exactly_one_separator() {
    assert_eq!(
        resolve_image_url("http://api", Some("/uploads/a.jpg")),
        "http://api/uploads/a.jpg"
    );
    assert_eq!(
        resolve_image_url("http://api", Some("uploads/a.jpg")),
        "http://api/uploads/a.jpg"
    );
}

#[test]
fn load_failure_falls_back_to_placeholder() {
    assert_eq!(fallback_image_url(), PLACEHOLDER_IMAGE);
}

#[test]
fn removing_middle_step_renumbers_contiguously() {
    let mut steps = vec![
        Instruction::new(1, "chop onions"),
        Instruction::new(2, "brown meat"),
        Instruction::new(3, "simmer"),
    ];

    let removed = remove_step(&mut steps, 1).unwrap();

    assert_eq!(removed.description, "brown meat");
    assert_eq!(
        steps,
        vec![
            Instruction::new(1, "chop onions"),
            Instruction::new(2, "simmer"),
        ]
    );
}
