// This file is part of shoal, a POSIX-compatible command-line shell.
// Copyright (C) 2025 the shoal authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! End-to-end expansion scenarios
//!
//! Each test drives the whole pipeline through the public API against a
//! virtual system, the way the command executor would for a simple
//! command's words.

use shoal_env::Env;
use shoal_env::exec::{CaptureResult, ExecError, FnExecutor};
use shoal_env::option::{BraceExpand, NullGlob, On};
use shoal_env::semantics::{ExitStatus, Field};
use shoal_env::system::VirtualSystem;
use shoal_env::variable::{HOME, Variable};
use shoal_expand::expansion::{command_word_flags, expand, expand_value};

fn values(fields: &[Field]) -> Vec<&str> {
    fields.iter().map(|f| f.value.as_str()).collect()
}

fn expand_command_word(env: &mut Env, word: &str) -> Vec<Field> {
    expand(env, word, command_word_flags()).unwrap()
}

/// Executor that emulates `echo`-only subshells.
fn echo_executor() -> FnExecutor {
    FnExecutor(Box::new(|command| {
        let output: String = command
            .split(';')
            .map(|part| {
                let part = part.trim();
                let echoed = part.strip_prefix("echo").unwrap_or(part).trim_start();
                format!("{echoed}\n")
            })
            .collect();
        Ok(CaptureResult {
            output: output.into_bytes(),
            exit_status: ExitStatus::SUCCESS,
        })
    }))
}

#[test]
fn literal_word() {
    let mut env = Env::new_virtual();
    let fields = expand_command_word(&mut env, "hello");
    assert_eq!(values(&fields), ["hello"]);
}

#[test]
fn unquoted_expansion_is_field_split() {
    let mut env = Env::new_virtual();
    env.variables
        .assign("x", Variable::new("one two three"))
        .unwrap();
    let fields = expand_command_word(&mut env, "$x");
    assert_eq!(values(&fields), ["one", "two", "three"]);
}

#[test]
fn quoted_expansion_is_not_split() {
    let mut env = Env::new_virtual();
    env.variables
        .assign("x", Variable::new("one two three"))
        .unwrap();
    let fields = expand_command_word(&mut env, "\"$x\"");
    assert_eq!(values(&fields), ["one two three"]);
}

#[test]
fn quoted_at_expands_to_one_field_per_parameter() {
    let mut env = Env::new_virtual();
    env.variables.positional_params_mut().values = vec!["a b".to_string(), "c".to_string()];
    let fields = expand_command_word(&mut env, "\"$@\"");
    assert_eq!(values(&fields), ["a b", "c"]);
}

#[test]
fn quoted_at_with_no_parameters_expands_to_no_fields() {
    let mut env = Env::new_virtual();
    let fields = expand_command_word(&mut env, "\"$@\"");
    assert_eq!(fields, []);
}

#[test]
fn default_value_does_not_assign() {
    let mut env = Env::new_virtual();
    let fields = expand_command_word(&mut env, "${y:-default}");
    assert_eq!(values(&fields), ["default"]);
    assert_eq!(env.variables.get("y"), None);
}

#[test]
fn assign_default_assigns() {
    let mut env = Env::new_virtual();
    let fields = expand_command_word(&mut env, "${y:=default}");
    assert_eq!(values(&fields), ["default"]);
    assert_eq!(env.variables.get_scalar("y"), Some("default"));
}

#[test]
fn length_expansion() {
    let mut env = Env::new_virtual();
    env.variables.assign("x", Variable::new("abcde")).unwrap();
    let fields = expand_command_word(&mut env, "${#x}");
    assert_eq!(values(&fields), ["5"]);
}

#[test]
fn shortest_prefix_removal() {
    let mut env = Env::new_virtual();
    env.variables.assign("x", Variable::new("/a/b/c")).unwrap();
    let fields = expand_command_word(&mut env, "${x#*/}");
    assert_eq!(values(&fields), ["a/b/c"]);
}

#[test]
fn longest_prefix_removal() {
    let mut env = Env::new_virtual();
    env.variables.assign("x", Variable::new("/a/b/c")).unwrap();
    let fields = expand_command_word(&mut env, "${x##*/}");
    assert_eq!(values(&fields), ["c"]);
}

#[test]
fn unquoted_command_substitution_splits_on_newlines() {
    let mut env = Env::new_virtual();
    env.executor = Box::new(echo_executor());
    let fields = expand_command_word(&mut env, "$(echo one; echo two)");
    assert_eq!(values(&fields), ["one", "two"]);
}

#[test]
fn quoted_command_substitution_keeps_inner_newlines() {
    let mut env = Env::new_virtual();
    env.executor = Box::new(echo_executor());
    let fields = expand_command_word(&mut env, "\"$(echo one; echo two)\"");
    assert_eq!(values(&fields), ["one\ntwo"]);
}

#[test]
fn brace_list_expansion() {
    let mut env = Env::new_virtual();
    assert_eq!(env.options.get(BraceExpand), On);
    let fields = expand_command_word(&mut env, "{a,b,c}x");
    assert_eq!(values(&fields), ["ax", "bx", "cx"]);
}

#[test]
fn brace_range_expansion() {
    let mut env = Env::new_virtual();
    let fields = expand_command_word(&mut env, "{1..3}");
    assert_eq!(values(&fields), ["1", "2", "3"]);
}

#[test]
fn brace_cross_product_cardinality() {
    let mut env = Env::new_virtual();
    let fields = expand_command_word(&mut env, "{a,b}{1,2,3}");
    assert_eq!(fields.len(), 6);
}

#[test]
fn tilde_expands_to_home() {
    let mut env = Env::new_virtual();
    env.variables.assign(HOME, Variable::new("/h")).unwrap();
    let fields = expand_command_word(&mut env, "~");
    assert_eq!(values(&fields), ["/h"]);
}

#[test]
fn tilde_in_assignment_value() {
    let mut env = Env::new_virtual();
    env.variables.assign(HOME, Variable::new("/h")).unwrap();
    let (field, _status) = expand_value(&mut env, "a=~/x").unwrap();
    assert_eq!(field.value, "a=/h/x");
}

#[test]
fn ansi_c_string() {
    let mut env = Env::new_virtual();
    let fields = expand_command_word(&mut env, r"$'\n\t\x41'");
    assert_eq!(values(&fields), ["\n\tA"]);
}

#[test]
fn pathname_expansion_is_sorted() {
    let mut env = Env::new_virtual();
    let system = VirtualSystem::new();
    {
        let mut state = system.state.borrow_mut();
        state.save_file("a.c", "");
        state.save_file("b.c", "");
        state.save_file("d.txt", "");
    }
    env.system = Box::new(system);
    let fields = expand_command_word(&mut env, "*.c");
    assert_eq!(values(&fields), ["a.c", "b.c"]);
}

#[test]
fn nullglob_drops_non_matching_word() {
    let mut env = Env::new_virtual();
    env.options.set(NullGlob, On);
    let fields = expand_command_word(&mut env, "*.nomatch");
    assert_eq!(fields, []);
}

#[test]
fn quoted_whitespace_is_preserved() {
    let mut env = Env::new_virtual();
    let fields = expand_command_word(&mut env, "\"a   b\"");
    assert_eq!(values(&fields), ["a   b"]);
}

#[test]
fn quoted_expansion_embedded_in_a_word() {
    let mut env = Env::new_virtual();
    env.variables.assign("x", Variable::new("1 2")).unwrap();
    let fields = expand_command_word(&mut env, "a\"$x\"b");
    assert_eq!(values(&fields), ["a1 2b"]);
}

#[test]
fn field_count_depends_only_on_value_and_ifs() {
    // The same string splits identically whether it came from a variable
    // or a command substitution.
    let mut env = Env::new_virtual();
    env.variables.assign("x", Variable::new("p q")).unwrap();
    env.executor = Box::new(FnExecutor::constant("p q"));
    let from_var = expand_command_word(&mut env, "$x");
    let from_subst = expand_command_word(&mut env, "$(anything)");
    assert_eq!(values(&from_var), values(&from_subst));
}

#[test]
fn substitution_trims_only_trailing_newlines() {
    let mut env = Env::new_virtual();
    env.executor = Box::new(FnExecutor::constant("  a\nb\r\n\n"));
    let fields = expand_command_word(&mut env, "\"$(anything)\"");
    assert_eq!(values(&fields), ["  a\nb"]);
}

#[test]
fn substitution_failure_propagates_exit_status() {
    let mut env = Env::new_virtual();
    env.executor = Box::new(FnExecutor(Box::new(|_| {
        Ok(CaptureResult {
            output: b"partial".to_vec(),
            exit_status: ExitStatus(42),
        })
    })));
    let fields = expand_command_word(&mut env, "$(failing)");
    assert_eq!(values(&fields), ["partial"]);
    assert_eq!(env.exit_status, ExitStatus(42));
}

#[test]
fn executor_spawn_failure_is_an_expansion_error() {
    let mut env = Env::new_virtual();
    env.executor = Box::new(FnExecutor(Box::new(|_| {
        Err(ExecError("no more processes".to_string()))
    })));
    let result = expand(&mut env, "$(anything)", command_word_flags());
    assert!(result.is_err());
}

#[test]
fn ifs_assigned_within_the_word_affects_its_own_splitting() {
    // The IFS value is read once, when the whole word is split.
    let mut env = Env::new_virtual();
    env.variables.assign("x", Variable::new("a:b c")).unwrap();
    let fields = expand_command_word(&mut env, "${IFS:=:}$x");
    assert_eq!(values(&fields), ["", "a", "b c"]);
}

#[test]
fn read_file_substitution() {
    let mut env = Env::new_virtual();
    let system = VirtualSystem::new();
    system
        .state
        .borrow_mut()
        .save_file("greeting", "hello\nworld\n\n\n");
    env.system = Box::new(system);
    let fields = expand_command_word(&mut env, "\"$(<greeting)\"");
    assert_eq!(values(&fields), ["hello\nworld"]);
}

#[test]
fn extglob_negation_in_trim() {
    use shoal_env::option::ExtGlob;
    let mut env = Env::new_virtual();
    env.options.set(ExtGlob, On);
    env.variables.assign("x", Variable::new("abc.txt")).unwrap();
    let fields = expand_command_word(&mut env, "${x%%.!(c)}");
    assert_eq!(values(&fields), ["abc"]);
}
