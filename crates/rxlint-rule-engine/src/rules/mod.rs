//! Built-in RxJS rules
//!
//! Each rule lives in its own module and follows the same layout: a static
//! [`RuleMeta`](crate::RuleMeta), a struct built from options, and handlers
//! registered in [`Rule::listeners`](crate::Rule::listeners).

mod ban_operators;
mod no_async_subscribe;
mod no_create;
mod no_ignored_subscribe;
mod no_internal;
mod no_nested_pipe;
mod no_nested_subscribe;
mod no_subject_value;
mod no_unsafe_takeuntil;

pub use ban_operators::BanOperators;
pub use no_async_subscribe::NoAsyncSubscribe;
pub use no_create::NoCreate;
pub use no_ignored_subscribe::NoIgnoredSubscribe;
pub use no_internal::NoInternal;
pub use no_nested_pipe::NoNestedPipe;
pub use no_nested_subscribe::NoNestedSubscribe;
pub use no_subject_value::NoSubjectValue;
pub use no_unsafe_takeuntil::NoUnsafeTakeuntil;

use crate::context::{Report, RuleContext};
use crate::nested::{ArgumentRegistry, CallVerdict, WatchedCall};
use crate::Result;
use rxlint_core::{NodeId, SyntaxTree};

/// Receiver of `receiver.method(...)`.
fn call_receiver(tree: &SyntaxTree, call: NodeId) -> Option<NodeId> {
    tree.callee(call)
        .and_then(|callee| tree.member_parts(callee))
        .map(|(object, _)| object)
}

/// Shared handler body of the nesting rules.
fn report_nested(
    watched: &WatchedCall,
    registry: &mut ArgumentRegistry,
    ctx: &mut RuleContext<'_>,
    call: NodeId,
) -> Result<()> {
    match watched.inspect(registry, ctx.tree(), ctx.oracle(), call) {
        CallVerdict::Nested { token, .. } => ctx.report("forbidden", token, Report::new()),
        CallVerdict::Outer { .. } | CallVerdict::Ignored => Ok(()),
    }
}
