//! Reducer composition utilities
//!
//! This module provides utilities for composing reducers:
//! - **`combine_reducers`**: Run multiple reducers on the same state/action
//! - **`scope_reducer`**: Focus a reducer on one field of a larger state
//!
//! A root reducer is typically built by scoping one small reducer per field
//! and combining the scoped reducers.
//!
//! ```
//! use billing_store_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//! use billing_store_core::composition::{combine_reducers, scope_reducer};
//! use std::sync::Arc;
//!
//! #[derive(Clone, Default)]
//! struct Flag {
//!     on: bool,
//! }
//!
//! #[derive(Clone, Default)]
//! struct Flags {
//!     banner: Flag,
//!     spinner: Flag,
//! }
//!
//! #[derive(Clone)]
//! enum Toggle {
//!     Banner,
//!     Spinner,
//! }
//!
//! struct FlagReducer(fn(&Toggle) -> bool);
//!
//! impl Reducer for FlagReducer {
//!     type State = Flag;
//!     type Action = Toggle;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut Flag, action: Toggle, _env: &()) -> SmallVec<[Effect<Toggle>; 4]> {
//!         if (self.0)(&action) {
//!             state.on = !state.on;
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let root = combine_reducers(vec![
//!     Arc::new(scope_reducer(
//!         FlagReducer(|a| matches!(a, Toggle::Banner)),
//!         |flags: &mut Flags| &mut flags.banner,
//!     )),
//!     Arc::new(scope_reducer(
//!         FlagReducer(|a| matches!(a, Toggle::Spinner)),
//!         |flags: &mut Flags| &mut flags.spinner,
//!     )),
//! ]);
//!
//! let mut flags = Flags::default();
//! let _ = root.reduce(&mut flags, Toggle::Spinner, &());
//! assert!(!flags.banner.on);
//! assert!(flags.spinner.on);
//! ```

use crate::SmallVec;
use crate::effect::Effect;
use crate::reducer::Reducer;
use std::sync::Arc;

/// A shareable, type-erased reducer
pub type SharedReducer<S, A, E> = Arc<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer is run in sequence, and all effects are collected and concatenated.
/// Reducers are held behind `Arc` so the combined reducer is cheap to clone,
/// which the Store runtime requires.
#[must_use]
pub fn combine_reducers<S, A, E>(reducers: Vec<SharedReducer<S, A, E>>) -> CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    CombinedReducer { reducers }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    reducers: Vec<SharedReducer<S, A, E>>,
}

impl<S, A, E> CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    /// Number of reducers combined
    #[must_use]
    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    /// True if no reducers were combined
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl<S, A, E> Clone for CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    fn clone(&self) -> Self {
        Self {
            reducers: self.reducers.clone(),
        }
    }
}

impl<S, A, E> Reducer for CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let mut all_effects = SmallVec::new();

        for reducer in &self.reducers {
            let effects = reducer.reduce(state, action.clone(), env);
            all_effects.extend(effects.into_iter().filter(|effect| !effect.is_none()));
        }

        all_effects
    }
}

/// Scopes a reducer to operate on one field of a larger state.
///
/// The `focus` lens hands the child reducer a mutable borrow of its field, so
/// the child can never observe or modify anything outside of it.
pub fn scope_reducer<S, SubS, A, E, R>(reducer: R, focus: fn(&mut S) -> &mut SubS) -> ScopedReducer<S, SubS, A, E, R>
where
    S: 'static,
    SubS: 'static,
    A: 'static,
    E: 'static,
    R: Reducer<State = SubS, Action = A, Environment = E>,
{
    ScopedReducer {
        reducer,
        focus,
        _phantom: std::marker::PhantomData,
    }
}

/// A scoped reducer that operates on a subset of state.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<S, SubS, A, E, R>
where
    S: 'static,
    SubS: 'static,
    A: 'static,
    E: 'static,
    R: Reducer<State = SubS, Action = A, Environment = E>,
{
    reducer: R,
    focus: fn(&mut S) -> &mut SubS,
    _phantom: std::marker::PhantomData<fn() -> (A, E)>,
}

impl<S, SubS, A, E, R> ScopedReducer<S, SubS, A, E, R>
where
    S: 'static,
    SubS: 'static,
    A: 'static,
    E: 'static,
    R: Reducer<State = SubS, Action = A, Environment = E>,
{
    /// The wrapped child reducer
    #[must_use]
    pub const fn inner(&self) -> &R {
        &self.reducer
    }
}

impl<S, SubS, A, E, R> Clone for ScopedReducer<S, SubS, A, E, R>
where
    S: 'static,
    SubS: 'static,
    A: 'static,
    E: 'static,
    R: Reducer<State = SubS, Action = A, Environment = E> + Clone,
{
    fn clone(&self) -> Self {
        Self {
            reducer: self.reducer.clone(),
            focus: self.focus,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<S, SubS, A, E, R> Reducer for ScopedReducer<S, SubS, A, E, R>
where
    S: 'static,
    SubS: 'static,
    A: 'static,
    E: 'static,
    R: Reducer<State = SubS, Action = A, Environment = E>,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        self.reducer.reduce((self.focus)(state), action, env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smallvec;
    use std::time::Duration;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Entry {
        loading: bool,
        value: Option<i32>,
    }

    #[derive(Clone, Debug, Default)]
    struct Table {
        left: Entry,
        right: Entry,
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum Side {
        Left,
        Right,
    }

    #[derive(Clone, Debug)]
    enum TestAction {
        Start(Side),
        Finish(Side, i32),
        Clear,
    }

    #[derive(Clone)]
    struct EntryReducer(Side);

    impl Reducer for EntryReducer {
        type State = Entry;
        type Action = TestAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TestAction::Start(side) if side == self.0 => {
                    *state = Entry { loading: true, value: None };
                    let side = self.0.clone();
                    smallvec![Effect::Delay {
                        duration: Duration::from_millis(1),
                        action: Box::new(TestAction::Finish(side, 7)),
                    }]
                },
                TestAction::Finish(side, value) if side == self.0 => {
                    *state = Entry { loading: false, value: Some(value) };
                    smallvec![Effect::None]
                },
                _ => smallvec![Effect::None],
            }
        }
    }

    struct ClearReducer;

    impl Reducer for ClearReducer {
        type State = Table;
        type Action = TestAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            if matches!(action, TestAction::Clear) {
                *state = Table::default();
            }
            smallvec![Effect::None]
        }
    }

    fn root() -> CombinedReducer<Table, TestAction, ()> {
        combine_reducers(vec![
            Arc::new(scope_reducer(EntryReducer(Side::Left), |t: &mut Table| &mut t.left)),
            Arc::new(scope_reducer(EntryReducer(Side::Right), |t: &mut Table| &mut t.right)),
            Arc::new(ClearReducer),
        ])
    }

    #[test]
    fn test_scoped_reducer_only_touches_its_field() {
        let root = root();
        let mut table = Table::default();

        let effects = root.reduce(&mut table, TestAction::Start(Side::Left), &());

        assert!(table.left.loading);
        assert_eq!(table.right, Entry::default());
        assert_eq!(effects.len(), 1);
        assert!(matches!(effects[0], Effect::Delay { .. }));
    }

    #[test]
    fn test_combined_reducer_drops_noop_effects() {
        let root = root();
        let mut table = Table::default();

        let effects = root.reduce(&mut table, TestAction::Finish(Side::Right, 3), &());

        assert!(effects.is_empty());
        assert_eq!(table.right.value, Some(3));
        assert_eq!(table.left, Entry::default());
    }

    #[test]
    fn test_cross_cutting_reducer_sees_whole_state() {
        let root = root();
        let mut table = Table::default();
        let _ = root.reduce(&mut table, TestAction::Finish(Side::Left, 1), &());
        let _ = root.reduce(&mut table, TestAction::Start(Side::Right), &());

        let _ = root.reduce(&mut table, TestAction::Clear, &());

        assert_eq!(table.left, Entry::default());
        assert_eq!(table.right, Entry::default());
    }

    #[test]
    fn test_combined_reducer_is_cloneable() {
        let root = root();
        let copy = root.clone();
        assert_eq!(copy.len(), 3);
        assert!(!copy.is_empty());
    }
}
