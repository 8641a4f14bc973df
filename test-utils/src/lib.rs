use std::{
    error::Error,
    path::Path,
    process::{Command, Output},
    str,
};

pub struct Expected<'a> {
    pub stdout: &'a str,
    pub stderr: &'a str,
}

impl<'a> Expected<'a> {
    fn assert_matches(self, output: &Output) -> Result<(), Box<dyn Error>> {
        assert_eq!(str::from_utf8(&output.stdout)?, self.stdout);
        assert_eq!(str::from_utf8(&output.stderr)?, self.stderr);
        Ok(())
    }
}

fn run(src_path: &Path) -> Result<Output, Box<dyn Error>> {
    Ok(Command::new(env!("CARGO_BIN_EXE_loom")).arg(src_path).output()?)
}

/// Runs the script at `src_path` through the `loom` binary and asserts its
/// stdout/stderr match `expected`.
pub fn check_run(src_path: &Path, expected: Expected) -> Result<(), Box<dyn Error>> {
    let output = run(src_path)?;
    expected.assert_matches(&output)?;
    assert!(
        output.status.success(),
        "loom exited with status {:?}",
        output.status.code()
    );
    Ok(())
}

/// Runs the script at `src_path` and asserts it exits non-zero, returning
/// its stderr for further assertions.
pub fn check_failing(src_path: &Path) -> Result<String, Box<dyn Error>> {
    let output = run(src_path)?;
    assert!(
        !output.status.success(),
        "expected loom to exit with a non-zero status"
    );
    Ok(str::from_utf8(&output.stderr)?.to_owned())
}
