// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 keystate contributors

//! Descriptor for state that folds values with a reduce function.

use super::descriptor::{Resolution, StateDescriptor, StateKind};
use super::Result;
use crate::typeutils::{StateValue, TypeInfo, TypeSerializer};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Combines two values of the same type into one.
///
/// Implemented for any `Fn(T, T) -> T + Send + Sync` closure.
pub trait ReduceFunction<T>: Send + Sync {
    fn reduce(&self, accumulator: T, value: T) -> T;
}

impl<T, F> ReduceFunction<T> for F
where
    F: Fn(T, T) -> T + Send + Sync,
{
    fn reduce(&self, accumulator: T, value: T) -> T {
        self(accumulator, value)
    }
}

/// [`StateDescriptor`] plus the function that folds added values.
///
/// Serializer resolution behaves exactly as for the base descriptor, which
/// this type dereferences to. The reduce function is only carried, never
/// called here; [`HeapReducingState`](super::HeapReducingState) is what
/// invokes it.
pub struct ReducingStateDescriptor<T: StateValue> {
    inner: StateDescriptor<T>,
    reduce_function: Arc<dyn ReduceFunction<T>>,
}

impl<T: StateValue> ReducingStateDescriptor<T> {
    pub fn with_serializer(
        name: impl Into<String>,
        reduce_function: impl ReduceFunction<T> + 'static,
        serializer: Box<dyn TypeSerializer<T>>,
    ) -> Self {
        Self::from_descriptor(
            StateDescriptor::from_parts(
                name.into(),
                StateKind::Reducing,
                Resolution::Resolved(serializer),
            ),
            Arc::new(reduce_function),
        )
    }

    pub fn with_type_info(
        name: impl Into<String>,
        reduce_function: impl ReduceFunction<T> + 'static,
        type_info: TypeInfo<T>,
    ) -> Self {
        Self::from_descriptor(
            StateDescriptor::from_parts(
                name.into(),
                StateKind::Reducing,
                Resolution::Unresolved(type_info),
            ),
            Arc::new(reduce_function),
        )
    }

    pub fn of_type(
        name: impl Into<String>,
        reduce_function: impl ReduceFunction<T> + 'static,
    ) -> Self {
        Self::with_type_info(name, reduce_function, TypeInfo::of())
    }

    pub(crate) fn from_descriptor(
        inner: StateDescriptor<T>,
        reduce_function: Arc<dyn ReduceFunction<T>>,
    ) -> Self {
        Self {
            inner,
            reduce_function,
        }
    }

    #[must_use]
    pub fn with_default_value(mut self, value: T) -> Self {
        self.inner.set_default_value(Some(value));
        self
    }

    pub fn set_queryable(&mut self, queryable_name: impl Into<String>) -> Result<()> {
        self.inner.set_queryable(queryable_name)
    }

    pub fn reduce_function(&self) -> &Arc<dyn ReduceFunction<T>> {
        &self.reduce_function
    }

    pub fn reduce(&self, accumulator: T, value: T) -> T {
        self.reduce_function.reduce(accumulator, value)
    }

    pub fn as_descriptor(&self) -> &StateDescriptor<T> {
        &self.inner
    }
}

impl<T: StateValue> Deref for ReducingStateDescriptor<T> {
    type Target = StateDescriptor<T>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T: StateValue> Clone for ReducingStateDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            reduce_function: Arc::clone(&self.reduce_function),
        }
    }
}

// Reduce functions are opaque and take no part in equality.
impl<T: StateValue> PartialEq for ReducingStateDescriptor<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T: StateValue> Eq for ReducingStateDescriptor<T> {}

impl<T: StateValue> std::hash::Hash for ReducingStateDescriptor<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

impl<T: StateValue> fmt::Debug for ReducingStateDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReducingStateDescriptor")
            .field("descriptor", &self.inner)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SerializerConfig;
    use crate::typeutils::LongSerializer;

    #[test]
    fn test_kind_is_reducing() {
        let descriptor = ReducingStateDescriptor::of_type("sum", |a: i64, b: i64| a + b);
        assert_eq!(descriptor.kind(), StateKind::Reducing);
        assert_eq!(descriptor.reduce(2, 3), 5);
    }

    #[test]
    fn test_not_equal_to_value_descriptor_of_same_name() {
        let reducing = ReducingStateDescriptor::with_serializer(
            "sum",
            |a: i64, b: i64| a + b,
            Box::new(LongSerializer::new()),
        );
        let value = StateDescriptor::with_serializer("sum", Box::new(LongSerializer::new()));
        assert_ne!(*reducing, value);
    }

    #[test]
    fn test_resolution_inherited() {
        let descriptor = ReducingStateDescriptor::of_type("max", |a: u32, b: u32| a.max(b));
        assert!(descriptor.serializer().is_err());

        let mut config = SerializerConfig::new();
        descriptor
            .initialize_serializer_unless_set(&mut config)
            .expect("resolve");
        let clone = descriptor.clone();
        assert!(clone.is_serializer_initialized());
        assert_eq!(clone, descriptor);
        assert!(Arc::ptr_eq(clone.reduce_function(), descriptor.reduce_function()));
    }
}
