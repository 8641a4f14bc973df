use std::path::Path;

use test_utils::{check_failing, check_run, Expected};

fn demo(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("demos").join(name)
}

#[test]
fn arithmetic_precedence() -> Result<(), Box<dyn std::error::Error>> {
    check_run(
        &demo("arithmetic.loom"),
        Expected {
            stdout: "14\n",
            stderr: "",
        },
    )
}

#[test]
fn string_concatenation() -> Result<(), Box<dyn std::error::Error>> {
    check_run(
        &demo("string_concat.loom"),
        Expected {
            stdout: "hi world\n",
            stderr: "",
        },
    )
}

#[test]
fn if_else_branch() -> Result<(), Box<dyn std::error::Error>> {
    check_run(
        &demo("if_else.loom"),
        Expected {
            stdout: "yes\n",
            stderr: "",
        },
    )
}

#[test]
fn function_definition_call_and_return() -> Result<(), Box<dyn std::error::Error>> {
    check_run(
        &demo("function_call.loom"),
        Expected {
            stdout: "42\n",
            stderr: "",
        },
    )
}

#[test]
fn array_push_and_print() -> Result<(), Box<dyn std::error::Error>> {
    check_run(
        &demo("array_push.loom"),
        Expected {
            stdout: "[1, 2, 3, 4]\n",
            stderr: "",
        },
    )
}

#[test]
fn for_loop_prints_inclusive_range() -> Result<(), Box<dyn std::error::Error>> {
    check_run(
        &demo("for_loop.loom"),
        Expected {
            stdout: "1\n2\n3\n",
            stderr: "",
        },
    )
}

#[test]
fn while_loop_accumulates() -> Result<(), Box<dyn std::error::Error>> {
    check_run(
        &demo("while_loop.loom"),
        Expected {
            stdout: "15\n",
            stderr: "",
        },
    )
}

#[test]
fn string_builtins() -> Result<(), Box<dyn std::error::Error>> {
    check_run(
        &demo("string_ops.loom"),
        Expected {
            stdout: "LOOM\nshout\n4\n1\noo\n",
            stderr: "",
        },
    )
}

#[test]
fn division_by_zero_is_a_runtime_error() -> Result<(), Box<dyn std::error::Error>> {
    let stderr = check_failing(&demo("division_by_zero.loom"))?;
    assert!(stderr.starts_with("Error: Division by zero"));
    Ok(())
}
