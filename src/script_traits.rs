//! Type-safe command line contracts.
//!
//! Instead of concatenating strings at the call site, a typed value
//! implements [`ScriptArgs`] and produces the program and arguments the
//! generated script runs. The struct definition is the contract.

/// Trait for typed command invocations written into a generated script.
///
/// # Invariants
///
/// - `program()` is a single shell word and is never quoted.
/// - `to_cli_args()` returns the arguments in the exact order they are
///   written; each element is emitted as-is, separated by one space.
pub trait ScriptArgs {
    /// The program to invoke (e.g. "ant").
    fn program(&self) -> &'static str;

    /// Arguments following the program, already rendered.
    fn to_cli_args(&self) -> Vec<String>;

    /// The full command line: program followed by its arguments.
    fn command_line(&self) -> String {
        let mut line = self.program().to_string();
        for arg in self.to_cli_args() {
            line.push(' ');
            line.push_str(&arg);
        }
        line
    }
}
