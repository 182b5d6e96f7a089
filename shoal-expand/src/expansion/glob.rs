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

//! Pathname expansion
//!
//! Pathname expansion scans directories and produces the pathnames
//! matching the input field. The field is split at `/` and each component
//! becomes a pattern; components without pattern characters are used
//! verbatim without scanning the directory. Quoted characters and
//! characters produced by tilde or brace expansion never act as pattern
//! characters.
//!
//! Matches are returned in byte-wise sorted order, filtered by the
//! `GLOBIGNORE` patterns. Without any match, the word is returned intact
//! by default, dropped under `nullglob`, or rejected under `failglob`.
//! A leading period only matches an explicit period unless `dotglob` is
//! on, and `.`/`..` are never produced. With `globstar`, a `**` component
//! matches any number of directories.

use super::Error;
use super::ErrorCause;
use super::attr::{AttrChar, AttrField, Origin};
use super::attr_strip::Strip;
use super::quote_removal::skip_quotes;
use itertools::Itertools as _;
use shoal_env::option::{DotGlob, FailGlob, GlobStar, NullGlob, On};
use shoal_env::semantics::Field;
use shoal_env::system::System;
use shoal_env::variable::GLOB_IGNORE;
use shoal_fnmatch::{Config, Pattern, PatternChar};

/// Performs pathname expansion on a field.
pub fn glob(env: &mut shoal_env::Env, field: AttrField) -> Result<Vec<Field>, Error> {
    let extglob = env.options.get(shoal_env::option::ExtGlob) == On;
    if !has_glob_chars(&field.chars, extglob) {
        return Ok(vec![field.remove_quotes_and_strip()]);
    }

    let mut config = super::attr_fnmatch::config_from_options(&env.options);
    config.literal_period = env.options.get(DotGlob) != On;

    let mut search = SearchEnv {
        system: &*env.system,
        config,
        globstar: env.options.get(GlobStar) == On,
        prefix: String::new(),
        results: Vec::new(),
    };
    search.search_dir(&field.chars);
    let mut results = search.results;

    if let Some(ignore) = env.variables.get_scalar(GLOB_IGNORE) {
        results = filter_ignored(results, ignore, &config);
    }

    if results.is_empty() {
        if env.options.get(FailGlob) == On {
            let pattern: String = skip_quotes(field.chars).strip().collect();
            return Err(Error {
                cause: ErrorCause::NonMatchingGlob { pattern },
                location: field.origin,
            });
        }
        if env.options.get(NullGlob) == On {
            return Ok(Vec::new());
        }
        return Ok(vec![field.remove_quotes_and_strip()]);
    }

    let origin = field.origin;
    Ok(results
        .into_iter()
        .sorted_unstable()
        .dedup()
        .map(|value| Field {
            value,
            origin: origin.clone(),
        })
        .collect())
}

/// Quick check whether the field contains unquoted pattern characters.
fn has_glob_chars(chars: &[AttrChar], extglob: bool) -> bool {
    let mut previous = None;
    for c in chars {
        if c.is_quoting {
            continue;
        }
        let special = !c.is_quoted && c.origin != Origin::HardExpansion;
        if special {
            match c.value {
                '*' | '?' | '[' => return true,
                '(' if extglob && matches!(previous, Some('+' | '@' | '!')) => return true,
                _ => {}
            }
        }
        previous = special.then_some(c.value);
    }
    false
}

/// Removes results matching any of the colon-separated ignore patterns.
fn filter_ignored(results: Vec<String>, ignore: &str, config: &Config) -> Vec<String> {
    let patterns: Vec<Pattern> = ignore
        .split(':')
        .filter(|p| !p.is_empty())
        .filter_map(|p| {
            Pattern::parse_with_config(shoal_fnmatch::without_escape(p), *config).ok()
        })
        .collect();
    results
        .into_iter()
        .filter(|path| !patterns.iter().any(|p| p.is_match(path)))
        .collect()
}

struct SearchEnv<'e> {
    system: &'e dyn System,
    config: Config,
    globstar: bool,
    prefix: String,
    results: Vec<String>,
}

/// Converts a pathname component to a glob pattern.
fn to_pattern(component: &[AttrChar], config: Config) -> Option<Pattern> {
    let chars = component.iter().filter_map(|c| {
        if c.is_quoting {
            None
        } else if c.is_quoted || c.origin == Origin::HardExpansion {
            Some(PatternChar::Literal(c.value))
        } else {
            Some(PatternChar::Normal(c.value))
        }
    });
    Pattern::parse_with_config(chars, config).ok()
}

/// Whether the component is an unquoted `**`.
fn is_globstar_component(component: &[AttrChar]) -> bool {
    let mut stars = 0;
    for c in component {
        if c.is_quoting {
            continue;
        }
        if c.value != '*' || c.is_quoted || c.origin == Origin::HardExpansion {
            return false;
        }
        stars += 1;
    }
    stars == 2
}

impl SearchEnv<'_> {
    /// Recursively searches directories for matching pathnames.
    fn search_dir(&mut self, suffix: &[AttrChar]) {
        let (component, new_suffix) = match suffix.iter().position(|c| c.value == '/') {
            None => (suffix, None),
            Some(index) => (&suffix[..index], Some(&suffix[index + 1..])),
        };

        if self.globstar && is_globstar_component(component) {
            self.search_globstar(new_suffix);
            return;
        }

        match to_pattern(component, self.config).map(Pattern::into_literal) {
            None => {
                let literal: String = skip_quotes(component.iter().copied()).strip().collect();
                self.push_component(new_suffix, &literal);
            }
            Some(Ok(literal)) => {
                self.push_component(new_suffix, &literal);
            }
            Some(Err(pattern)) => {
                for name in self.entries() {
                    if pattern.is_match(&name) {
                        self.push_component(new_suffix, &name);
                    }
                }
            }
        }
    }

    /// Expands a `**` component: zero or more directory levels.
    fn search_globstar(&mut self, new_suffix: Option<&[AttrChar]>) {
        match new_suffix {
            Some(suffix) => self.search_dir(suffix),
            None => self.collect_recursive(),
        }

        for name in self.entries() {
            if self.hidden(&name) {
                continue;
            }
            let old_len = self.prefix.len();
            self.prefix.push_str(&name);
            if self.system.is_directory(&self.prefix) {
                self.prefix.push('/');
                self.search_globstar(new_suffix);
            }
            self.prefix.truncate(old_len);
        }
    }

    /// Collects every file under the current prefix, for a trailing `**`.
    fn collect_recursive(&mut self) {
        for name in self.entries() {
            if self.hidden(&name) {
                continue;
            }
            let old_len = self.prefix.len();
            self.prefix.push_str(&name);
            self.results.push(self.prefix.clone());
            if self.system.is_directory(&self.prefix) {
                self.prefix.push('/');
                self.collect_recursive();
            }
            self.prefix.truncate(old_len);
        }
    }

    fn entries(&self) -> Vec<String> {
        self.system.dir_entries(&self.prefix).unwrap_or_default()
    }

    fn hidden(&self, name: &str) -> bool {
        self.config.literal_period && name.starts_with('.')
    }

    /// Appends a component to the prefix and continues with the suffix.
    fn push_component(&mut self, suffix: Option<&[AttrChar]>, name: &str) {
        let old_len = self.prefix.len();
        self.prefix.push_str(name);

        match suffix {
            None => {
                if self.system.file_exists(&self.prefix) {
                    self.results.push(self.prefix.clone());
                }
            }
            Some(suffix) => {
                self.prefix.push('/');
                self.search_dir(suffix);
            }
        }

        self.prefix.truncate(old_len);
    }
}
