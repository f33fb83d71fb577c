pub mod compiler;
pub mod javadoc;
pub mod pom;
pub mod tokens;

pub use compiler::javac_args;
pub use javadoc::JavadocOptions;
pub use pom::render_pom;
pub use tokens::ReplaceTokens;
