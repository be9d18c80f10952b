pub use crate::collections::{SignalSet, SignalVec};
pub use crate::color::Color;
pub use crate::context::{
    Context, expect_context, has_context, insert_context, provide_context, provide_contexts,
    try_context, use_context,
};
pub use crate::effects::{Dispose, effect, on_unmount};
pub use crate::error::ContextError;
pub use crate::lifecycle::{Lifecycle, mount};
pub use crate::reactive::{observe, remove_observer, untracked};
pub use crate::scope::{Scope, current_scope, scoped_effect};
pub use crate::signal::{Signal, SubId, signal};
pub use crate::state::{Derived, derived};
pub use crate::timer::{Clock, ManualClock, SystemClock, TimerHandle, TimerQueue, TimerService};
