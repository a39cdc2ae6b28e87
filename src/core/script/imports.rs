//! Import and hook injection for script fragments that gained module-scope
//! translation calls.

use std::collections::HashSet;

use swc_common::Spanned;
use swc_ecma_ast::{
    Decl, Expr, ImportSpecifier, Lit, ModuleDecl, ModuleExportName, ModuleItem, ObjectPatProp,
    Pat, Stmt,
};

use crate::core::edits::Edit;
use crate::core::provider::{HookDeclaration, ImportDeclaration};
use crate::core::script::parser::ParsedScript;

/// What a script already imports and declares, plus where new lines go.
#[derive(Debug, Default)]
pub struct ModuleBindings {
    /// `(source, imported name)` pairs of named and default imports.
    imported: HashSet<(String, String)>,
    /// Names bound at module level by imports and declarations.
    declared: HashSet<String>,
    last_import_end: Option<usize>,
    /// Start of the first statement after any leading directives.
    first_item_start: Option<usize>,
    semicolons: bool,
}

impl ModuleBindings {
    pub fn scan(parsed: &ParsedScript, source: &str) -> Self {
        let mut bindings = ModuleBindings::default();

        for item in &parsed.module.body {
            match item {
                ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => {
                    let (_, end) = parsed.range(import.span);
                    bindings.last_import_end = Some(end);
                    let Some(module_path) = import.src.value.as_str() else {
                        continue;
                    };
                    for specifier in &import.specifiers {
                        bindings.add_import(module_path, specifier);
                    }
                }
                ModuleItem::Stmt(Stmt::Expr(stmt))
                    if bindings.first_item_start.is_none()
                        && matches!(&*stmt.expr, Expr::Lit(Lit::Str(_))) => {}
                _ => {
                    if bindings.first_item_start.is_none() {
                        bindings.first_item_start = Some(parsed.range(item.span()).0);
                    }
                    match item {
                        ModuleItem::Stmt(Stmt::Decl(decl)) => bindings.add_decl(decl),
                        ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => {
                            bindings.add_decl(&export.decl)
                        }
                        _ => {}
                    }
                }
            }
        }

        bindings.semicolons = match bindings.last_import_end {
            Some(end) => source[..end].trim_end().ends_with(';'),
            None => source.lines().any(|line| line.trim_end().ends_with(';')),
        };
        bindings
    }

    fn add_import(&mut self, module_path: &str, specifier: &ImportSpecifier) {
        let (local, imported) = match specifier {
            ImportSpecifier::Named(named) => {
                let local = named.local.sym.to_string();
                let imported = match &named.imported {
                    Some(ModuleExportName::Ident(ident)) => ident.sym.to_string(),
                    Some(ModuleExportName::Str(s)) => s.value.to_string_lossy().to_string(),
                    None => local.clone(),
                };
                (local, imported)
            }
            ImportSpecifier::Default(default) => {
                (default.local.sym.to_string(), "default".to_string())
            }
            ImportSpecifier::Namespace(ns) => (ns.local.sym.to_string(), "*".to_string()),
        };
        self.imported.insert((module_path.to_string(), imported));
        self.declared.insert(local);
    }

    /// Names bound by a declaration directly in the module body. Bindings in
    /// nested scopes do not shadow module-level ones.
    fn add_decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Var(var) => {
                for declarator in &var.decls {
                    add_pattern(&mut self.declared, &declarator.name);
                }
            }
            Decl::Fn(function) => {
                self.declared.insert(function.ident.sym.to_string());
            }
            Decl::Class(class) => {
                self.declared.insert(class.ident.sym.to_string());
            }
            _ => {}
        }
    }

    pub fn is_imported(&self, source: &str, name: &str) -> bool {
        self.imported
            .contains(&(source.to_string(), name.to_string()))
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.declared.contains(name)
    }

    /// Names from `import` that still need importing.
    fn missing_names<'i>(&self, import: &'i ImportDeclaration) -> Vec<&'i str> {
        import
            .names
            .iter()
            .map(String::as_str)
            .filter(|name| !self.is_imported(&import.source, name) && !self.is_declared(name))
            .collect()
    }

    /// A single insertion adding the missing imports and hooks, or `None` when
    /// everything is already present.
    pub fn injection_edit(
        &self,
        imports: &[ImportDeclaration],
        hooks: &[HookDeclaration],
    ) -> Option<Edit> {
        let terminator = if self.semicolons { ";" } else { "" };
        let mut lines: Vec<String> = Vec::new();
        let mut seen: HashSet<(String, String)> = HashSet::new();

        for import in imports {
            let names: Vec<&str> = self
                .missing_names(import)
                .into_iter()
                .filter(|name| seen.insert((import.source.clone(), name.to_string())))
                .collect();
            if names.is_empty() {
                continue;
            }
            let line = ImportDeclaration::new(import.source.as_str(), &names);
            lines.push(format!("{}{}", line, terminator));
        }

        for hook in hooks {
            if hook.bindings.iter().any(|name| self.is_declared(name)) {
                continue;
            }
            lines.push(format!("{}{}", hook.code, terminator));
        }

        if lines.is_empty() {
            return None;
        }

        match (self.last_import_end, self.first_item_start) {
            (Some(end), _) => Some(Edit::insert(end, format!("\n{}", lines.join("\n")))),
            (None, Some(start)) => Some(Edit::insert(start, format!("{}\n\n", lines.join("\n")))),
            (None, None) => Some(Edit::insert(0, format!("{}\n", lines.join("\n")))),
        }
    }
}

fn add_pattern(names: &mut HashSet<String>, pat: &Pat) {
    match pat {
        Pat::Ident(ident) => {
            names.insert(ident.id.sym.to_string());
        }
        Pat::Object(object) => {
            for prop in &object.props {
                match prop {
                    ObjectPatProp::KeyValue(kv) => add_pattern(names, &kv.value),
                    ObjectPatProp::Assign(assign) => {
                        names.insert(assign.key.id.sym.to_string());
                    }
                    ObjectPatProp::Rest(rest) => add_pattern(names, &rest.arg),
                }
            }
        }
        Pat::Array(array) => {
            for elem in array.elems.iter().flatten() {
                add_pattern(names, elem);
            }
        }
        Pat::Assign(assign) => add_pattern(names, &assign.left),
        Pat::Rest(rest) => add_pattern(names, &rest.arg),
        _ => {}
    }
}
