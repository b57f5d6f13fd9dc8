//! JavaScript/TypeScript extractor based on regular expressions.
//!
//! Recognizes two import shapes:
//!
//! - module imports: `import x from './a'`, `import { y } from "./b"`,
//!   `import type { T } from './c'`, `import './side-effect'`
//! - call imports: `require('./d')`, `import('./e')`
//!
//! Re-exports through barrels (`export * from`) and computed specifiers are
//! not imports here, so the resulting graph under-approximates the real one.

use arch_health_core::DeclarationCounts;
use regex::Regex;

use crate::extractor::{FileAnalysis, ImportInfo, ImportKind, LanguageExtractor};

const IMPORT_STATEMENT: &str =
    r#"(?m)^[ \t]*import\s+(?:type\s+)?(?:[\w$*{}\s,]+?\s+from\s+)?['"]([^'"\n]+)['"]"#;
const IMPORT_CALL: &str = r#"\b(?:require|import)\s*\(\s*['"]([^'"\n]+)['"]\s*\)"#;

const EXPORT_DECL: &str = r"\bexport\s+(?:default\s+)?(?:declare\s+)?(?:async\s+)?(?:abstract\s+)?(?:function\*?|class|interface|type|enum|const|let|var)\s+([A-Za-z_$][\w$]*)";
const EXPORT_LIST: &str = r"\bexport\s*(?:type\s+)?\{([^}]*)\}";

const ABSTRACT_FAMILIES: [&str; 4] = [
    r"\binterface\s+[A-Za-z_$][\w$]*",
    r"\babstract\s+class\s+[A-Za-z_$][\w$]*",
    r"\btype\s+[A-Za-z_$][\w$]*(?:\s*<[^>]*>)?\s*=",
    r"\bexport\s+type\s+[A-Za-z_$][\w$]*",
];
const CONCRETE_FAMILIES: [&str; 4] = [
    r"\bclass\s+[A-Za-z_$][\w$]*",
    r"\bfunction\*?\s+[A-Za-z_$][\w$]*",
    r"\bconst\s+[A-Za-z_$][\w$]*\s*[:=]",
    r"\bexport\s+const\s+[A-Za-z_$][\w$]*",
];

/// Extracts imports, exports and declaration counts from JS/TS source.
pub struct EcmaScriptExtractor {
    import_statement: Regex,
    import_call: Regex,
    export_decl: Regex,
    export_list: Regex,
    abstract_families: Vec<Regex>,
    concrete_families: Vec<Regex>,
}

impl EcmaScriptExtractor {
    /// Creates a new extractor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            import_statement: compile(IMPORT_STATEMENT),
            import_call: compile(IMPORT_CALL),
            export_decl: compile(EXPORT_DECL),
            export_list: compile(EXPORT_LIST),
            abstract_families: ABSTRACT_FAMILIES.iter().map(|p| compile(p)).collect(),
            concrete_families: CONCRETE_FAMILIES.iter().map(|p| compile(p)).collect(),
        }
    }

    fn extract_imports(&self, source: &str) -> Vec<ImportInfo> {
        let statements = self
            .import_statement
            .captures_iter(source)
            .map(|c| (c, ImportKind::Static));
        let calls = self
            .import_call
            .captures_iter(source)
            .map(|c| (c, ImportKind::Call));

        let mut found: Vec<(usize, String, ImportKind)> = statements
            .chain(calls)
            .filter_map(|(caps, kind)| {
                let start = caps.get(0)?.start();
                let spec = caps.get(1)?;
                Some((start, spec.as_str().to_string(), kind))
            })
            .collect();
        found.sort_by_key(|(offset, _, _)| *offset);

        found
            .into_iter()
            .map(|(offset, specifier, kind)| ImportInfo {
                line: line_of(source, offset),
                specifier,
                kind,
            })
            .collect()
    }

    fn extract_exports(&self, source: &str) -> Vec<String> {
        let mut found: Vec<(usize, String)> = self
            .export_decl
            .captures_iter(source)
            .filter_map(|c| c.get(1))
            .map(|m| (m.start(), m.as_str().to_string()))
            .collect();

        for caps in self.export_list.captures_iter(source) {
            let Some(list) = caps.get(1) else { continue };
            for item in list.as_str().split(',') {
                if let Some(name) = exported_name(item) {
                    found.push((list.start(), name.to_string()));
                }
            }
        }

        found.sort_by_key(|(offset, _)| *offset);
        found.into_iter().map(|(_, name)| name).collect()
    }

    fn count_declarations(&self, source: &str) -> DeclarationCounts {
        let count = |families: &[Regex]| -> usize {
            families.iter().map(|re| re.find_iter(source).count()).sum()
        };
        DeclarationCounts::new(
            count(&self.abstract_families),
            count(&self.concrete_families),
        )
    }
}

impl Default for EcmaScriptExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageExtractor for EcmaScriptExtractor {
    fn language_id(&self) -> &'static str {
        "ecmascript"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["ts", "tsx", "js", "jsx", "mjs", "cjs", "mts", "cts"]
    }

    fn analyze(&self, source: &str) -> FileAnalysis {
        FileAnalysis {
            imports: self.extract_imports(source),
            exports: self.extract_exports(source),
            declarations: self.count_declarations(source),
        }
    }
}

#[allow(clippy::expect_used)] // Patterns are literals in this module.
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern must compile")
}

/// `a` -> `a`, `a as b` -> `b`, `type T` -> `T`, `default as X` -> `X`.
fn exported_name(item: &str) -> Option<&str> {
    let item = item.trim();
    let item = item.strip_prefix("type ").map_or(item, str::trim);
    let name = match item.rsplit_once(" as ") {
        Some((_, alias)) => alias.trim(),
        None => item,
    };
    (!name.is_empty()).then_some(name)
}

fn line_of(source: &str, offset: usize) -> usize {
    source[..offset].bytes().filter(|&b| b == b'\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(src: &str) -> FileAnalysis {
        EcmaScriptExtractor::new().analyze(src)
    }

    fn specs(a: &FileAnalysis) -> Vec<&str> {
        a.specifiers().collect()
    }

    #[test]
    fn extracts_module_imports() {
        let a = analyze(
            r#"import React from 'react';
import { useState, useEffect as effect } from "react";
import * as api from './api';
import type { User } from '../types/user';
import './styles.css';
import Default, { named } from './mixed';
"#,
        );
        assert_eq!(
            specs(&a),
            vec![
                "react",
                "react",
                "./api",
                "../types/user",
                "./styles.css",
                "./mixed"
            ]
        );
        assert!(a.imports.iter().all(|i| i.kind == ImportKind::Static));
        assert_eq!(a.imports[2].line, 3);
    }

    #[test]
    fn extracts_multiline_named_import() {
        let a = analyze("import {\n  a,\n  b,\n} from './letters';\n");
        assert_eq!(specs(&a), vec!["./letters"]);
        assert_eq!(a.imports[0].line, 1);
    }

    #[test]
    fn extracts_require_and_dynamic_import_in_source_order() {
        let a = analyze(
            r#"const express = require('express');
import { db } from './db';
async function load() {
  const mod = await import("./lazy");
  const cfg = require ( './config' );
}
"#,
        );
        assert_eq!(specs(&a), vec!["express", "./db", "./lazy", "./config"]);
        assert_eq!(a.imports[0].kind, ImportKind::Call);
        assert_eq!(a.imports[1].kind, ImportKind::Static);
        assert_eq!(a.imports[2].line, 4);
    }

    #[test]
    fn ignores_computed_specifiers_and_reexports() {
        let a = analyze(
            r#"const name = './x';
require(name);
import(`./template/${name}`);
export * from './barrel';
export { thing } from './thing';
"#,
        );
        assert!(a.imports.is_empty());
    }

    #[test]
    fn extracts_named_exports() {
        let a = analyze(
            r"export function handler() {}
export async function load() {}
export default class UserController {}
export interface User { id: string }
export type Id = string;
export const LIMIT = 10;
export let counter = 0;
export enum Role { Admin }
export abstract class Base {}
",
        );
        assert_eq!(
            a.exports,
            vec![
                "handler",
                "load",
                "UserController",
                "User",
                "Id",
                "LIMIT",
                "counter",
                "Role",
                "Base"
            ]
        );
    }

    #[test]
    fn extracts_grouped_exports() {
        let a = analyze("function a() {}\nconst b = 1;\nexport { a, b as renamed, type T };\n");
        assert_eq!(a.exports, vec!["a", "renamed", "T"]);
    }

    #[test]
    fn interface_only_file_is_fully_abstract() {
        let a = analyze("interface A { x: number }\ninterface B extends A { y: string }\n");
        assert_eq!(a.declarations, DeclarationCounts::new(2, 0));
        assert!((a.declarations.abstractness() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn counts_each_declaration_family() {
        let a = analyze(
            r"export type Id = string;
abstract class Repo {}
class UserRepo extends Repo {}
function helper() {}
export const DEFAULT: number = 1;
",
        );
        // abstract: `type Id =`, `export type Id`, `abstract class Repo`
        // concrete: `class Repo`, `class UserRepo`, `function helper`,
        //           `const DEFAULT:`, `export const DEFAULT`
        assert_eq!(a.declarations, DeclarationCounts::new(3, 5));
    }

    #[test]
    fn empty_source() {
        let a = analyze("");
        assert!(a.imports.is_empty());
        assert!(a.exports.is_empty());
        assert_eq!(a.declarations, DeclarationCounts::default());
    }

    #[test]
    fn exported_name_handles_aliases() {
        assert_eq!(exported_name(" a "), Some("a"));
        assert_eq!(exported_name("a as b"), Some("b"));
        assert_eq!(exported_name("type T"), Some("T"));
        assert_eq!(exported_name("default as X"), Some("X"));
        assert_eq!(exported_name("  "), None);
    }
}
