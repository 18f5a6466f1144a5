//! Frame layout
//!
//! Assigns every parameter and local of every procedure a fixed offset from
//! the frame pointer. The whole table is built before any code is emitted, so
//! calls to procedures declared later and references to variables declared
//! after their first use all resolve.
//!
//! Layout relative to `$29` (the stack grows toward lower addresses):
//!
//! ```text
//!   4 * n   first parameter      (pushed first by the caller)
//!   ...
//!   4       last parameter
//!   0       first local
//!  -4       second local
//!   ...
//! ```

use log::{debug, trace, warn};
use std::collections::HashMap;
use wlp4_common::{Type, WORD_SIZE};
use wlp4_tree::typed_ast::{Declaration, ProcedureDef, ProcedureKind, Program};

/// A variable with its frame slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub ty: Type,
    /// Byte offset from the frame pointer
    pub offset: i32,
}

/// How the runtime passes the entry procedure's first argument
///
/// Decided from the first parameter's type. An array entry would need the
/// runtime `init` routine before any allocation; that call is not emitted,
/// so this is recorded for inspection only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryArgument {
    /// `int wain(int, int)`
    Scalar,
    /// `int wain(int*, int)`: an array and its length
    Array,
}

/// Layout of one procedure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcedureFrame {
    pub name: String,
    pub kind: ProcedureKind,
    pub param_names: Vec<String>,
    pub param_types: Vec<Type>,
    local_names: Vec<String>,
    symbols: HashMap<String, Symbol>,
    entry_argument: Option<EntryArgument>,
}

impl ProcedureFrame {
    fn new(name: &str, kind: ProcedureKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            param_names: Vec::new(),
            param_types: Vec::new(),
            local_names: Vec::new(),
            symbols: HashMap::new(),
            entry_argument: None,
        }
    }

    /// Build the layout of a single procedure
    pub fn build(def: &ProcedureDef) -> Self {
        let mut frame = Self::new(&def.name, def.kind);
        for param in &def.params {
            frame.add_param(param);
        }
        for local in &def.locals {
            frame.add_local(&local.decl);
        }
        frame.finish_params();

        if def.is_entry() {
            frame.entry_argument = Some(match def.params.first().map(|p| p.ty) {
                Some(Type::IntPtr) => EntryArgument::Array,
                _ => EntryArgument::Scalar,
            });
        }
        frame
    }

    fn insert(&mut self, symbol: Symbol) {
        trace!("{}: {} -> {}($29)", self.name, symbol.name, symbol.offset);
        if let Some(previous) = self.symbols.insert(symbol.name.clone(), symbol) {
            warn!("{}: '{}' declared more than once", self.name, previous.name);
        }
    }

    /// Parameter offsets are fixed later, once the count is known
    fn add_param(&mut self, decl: &Declaration) {
        self.param_names.push(decl.name.clone());
        self.param_types.push(decl.ty);
        self.insert(Symbol {
            name: decl.name.clone(),
            ty: decl.ty,
            offset: 0,
        });
    }

    fn add_local(&mut self, decl: &Declaration) {
        let offset = -WORD_SIZE * self.local_names.len() as i32;
        self.local_names.push(decl.name.clone());
        self.insert(Symbol {
            name: decl.name.clone(),
            ty: decl.ty,
            offset,
        });
    }

    fn finish_params(&mut self) {
        let count = self.param_count() as i32;
        for (index, name) in self.param_names.iter().enumerate() {
            if let Some(symbol) = self.symbols.get_mut(name) {
                symbol.offset = WORD_SIZE * (count - index as i32);
            }
        }
    }

    pub fn param_count(&self) -> usize {
        self.param_names.len()
    }

    pub fn local_count(&self) -> usize {
        self.local_names.len()
    }

    pub fn local_names(&self) -> &[String] {
        &self.local_names
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    /// Position of `name` among the parameters
    pub fn param_index(&self, name: &str) -> Option<usize> {
        self.param_names.iter().position(|param| param == name)
    }

    pub fn is_entry(&self) -> bool {
        self.kind == ProcedureKind::Entry
    }

    /// Only set for the entry procedure
    pub fn entry_argument(&self) -> Option<EntryArgument> {
        self.entry_argument
    }

    /// Stack words the procedure's own epilogue releases
    ///
    /// The entry procedure saved its two argument registers itself; ordinary
    /// procedures leave their parameters to the caller.
    pub fn epilogue_slots(&self) -> usize {
        match self.kind {
            ProcedureKind::Entry => self.param_count() + self.local_count(),
            ProcedureKind::Ordinary => self.local_count(),
        }
    }
}

/// Layouts of every procedure in the program, built before emission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcedureTable {
    frames: Vec<ProcedureFrame>,
    index: HashMap<String, usize>,
}

impl ProcedureTable {
    pub fn build(program: &Program) -> Self {
        let mut table = Self {
            frames: Vec::new(),
            index: HashMap::new(),
        };
        for def in program.all_procedures() {
            let frame = ProcedureFrame::build(def);
            debug!(
                "Laid out '{}': {} parameter(s), {} local(s)",
                frame.name,
                frame.param_count(),
                frame.local_count()
            );
            if table.index.insert(frame.name.clone(), table.frames.len()).is_some() {
                warn!("Procedure '{}' defined more than once", frame.name);
            }
            table.frames.push(frame);
        }
        table
    }

    pub fn get(&self, name: &str) -> Option<&ProcedureFrame> {
        self.index.get(name).and_then(|&i| self.frames.get(i))
    }

    /// Frames in emission order, entry first
    pub fn iter(&self) -> impl Iterator<Item = &ProcedureFrame> {
        self.frames.iter()
    }
}
