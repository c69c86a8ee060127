trait ErrorReporting {
    fn src(&self) -> &str;

    fn error_at(&self, offset: usize, kind: ErrorKind) -> CompileError {
        CompileError::at(self.src(), offset, kind)
    }

    fn error_tok(&self, tok: &Token, kind: ErrorKind) -> CompileError {
        self.error_at(tok.loc.offset, kind)
    }
}

type P<T> = Box<T>;

pub mod codegen;
pub mod error;
pub mod eval;
pub mod parser;
pub mod tokenizer;

pub use codegen::*;
pub use error::*;
pub use eval::*;
pub use parser::*;
pub use tokenizer::*;

/// Deepest parenthesis nesting, and tallest operator chain, accepted by default.
pub const DEFAULT_MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Upper bound on both parser recursion and the height of the tree it
    /// builds. Exceeding it fails with [`ErrorKind::NestingTooDeep`].
    pub max_depth: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Compile an expression into Intel-syntax x86-64 assembly.
pub fn compile(src: &str) -> CompileResult<String> {
    compile_with(src, &CompileOptions::default())
}

pub fn compile_with(src: &str, options: &CompileOptions) -> CompileResult<String> {
    let tokens = Tokenizer::new(src).tokenize()?;
    let node = Parser::with_options(src, tokens, options).parse()?;
    Ok(generate(&node))
}

/// Pull the single expression argument out of `argv`.
pub fn parse_args(args: impl IntoIterator<Item = String>) -> Result<String, UsageError> {
    let mut args = args.into_iter();
    let program = args.next().unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());

    match (args.next(), args.next()) {
        (Some(src), None) => Ok(src),
        _ => Err(UsageError { program }),
    }
}
