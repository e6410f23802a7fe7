//! Expression trees for model equations.
//!
//! Equations are stored as small tagged trees rather than text, so the solver
//! and the oracle can evaluate them without a parser. The `_p` / `_ss` naming
//! convention lives in the data (`Timing`, `Expr::SteadyState`) and is only
//! turned back into text by the `Display` impls in `render`.
pub mod eval;
pub mod linear;
pub mod node;
mod render;

pub use eval::{Bindings, Dual, EvalError};
pub use linear::{LinearForm, LinearizeError};
pub use node::{next, num, param, ss, var, Expr, Timing, VarRef};
pub use render::{NEXT_SUFFIX, STEADY_STATE_SUFFIX};
