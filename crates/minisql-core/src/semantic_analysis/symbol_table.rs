// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The symbol table: declared tables and users.
//!
//! Tables and users are kept in declaration order so that iteration (and
//! therefore every report built from it) is deterministic. A name index gives
//! constant-time lookup. Names are compared exactly, with no case folding.
//!
//! The table only grows: there is no statement that removes a declaration.

use std::collections::HashMap;

use ecow::EcoString;

use crate::ast::DataType;
use crate::source_analysis::Span;

/// A declared column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: EcoString,
    pub data_type: DataType,
    /// Where the column was declared.
    pub span: Span,
}

/// A declared table with its ordered columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub name: EcoString,
    pub columns: Vec<Column>,
    /// Where the table name was declared.
    pub span: Span,
}

impl TableSchema {
    /// Looks up a column by name, returning its index and definition.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<(usize, &Column)> {
        self.columns
            .iter()
            .enumerate()
            .find(|(_, column)| column.name == name)
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.columns.len()
    }
}

/// A privilege granted on a table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GrantedPrivilege {
    pub privilege: EcoString,
    pub table: EcoString,
}

/// A declared user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub name: EcoString,
    pub password: EcoString,
    /// Privileges in the order they were granted.
    pub privileges: Vec<GrantedPrivilege>,
    /// Where the user name was declared.
    pub span: Span,
}

impl UserRecord {
    /// Returns `true` if `privilege` has been granted on `table`.
    #[must_use]
    pub fn has_privilege(&self, privilege: &str, table: &str) -> bool {
        self.privileges
            .iter()
            .any(|p| p.privilege == privilege && p.table == table)
    }
}

/// What happened when a privilege was granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantOutcome {
    /// The privilege was recorded.
    Granted,
    /// The user already held the privilege; nothing changed.
    AlreadyGranted,
    /// No such user.
    UnknownUser,
}

/// Registry of declared tables and users.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    tables: Vec<TableSchema>,
    table_index: HashMap<EcoString, usize>,
    users: Vec<UserRecord>,
    user_index: HashMap<EcoString, usize>,
}

impl SymbolTable {
    /// Creates an empty symbol table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a table by exact name.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.table_index.get(name).map(|&i| &self.tables[i])
    }

    /// Looks up a user by exact name.
    #[must_use]
    pub fn user(&self, name: &str) -> Option<&UserRecord> {
        self.user_index.get(name).map(|&i| &self.users[i])
    }

    /// Tables in declaration order.
    pub fn tables(&self) -> impl Iterator<Item = &TableSchema> {
        self.tables.iter()
    }

    /// Users in declaration order.
    pub fn users(&self) -> impl Iterator<Item = &UserRecord> {
        self.users.iter()
    }

    /// Registers a table. Returns `false` (and changes nothing) if a table of
    /// that name already exists.
    pub fn define_table(&mut self, schema: TableSchema) -> bool {
        if self.table_index.contains_key(&schema.name) {
            return false;
        }
        self.table_index.insert(schema.name.clone(), self.tables.len());
        self.tables.push(schema);
        true
    }

    /// Registers a user with no privileges. Returns `false` (and changes
    /// nothing) if a user of that name already exists.
    pub fn define_user(&mut self, name: EcoString, password: EcoString, span: Span) -> bool {
        if self.user_index.contains_key(&name) {
            return false;
        }
        self.user_index.insert(name.clone(), self.users.len());
        self.users.push(UserRecord {
            name,
            password,
            privileges: Vec::new(),
            span,
        });
        true
    }

    /// Grants `privilege` on `table` to `user`.
    ///
    /// The table is not checked here; callers resolve it first.
    pub fn grant(&mut self, user: &str, privilege: &str, table: &str) -> GrantOutcome {
        let Some(&index) = self.user_index.get(user) else {
            return GrantOutcome::UnknownUser;
        };
        let record = &mut self.users[index];
        if record.has_privilege(privilege, table) {
            return GrantOutcome::AlreadyGranted;
        }
        record.privileges.push(GrantedPrivilege {
            privilege: privilege.into(),
            table: table.into(),
        });
        GrantOutcome::Granted
    }
}
