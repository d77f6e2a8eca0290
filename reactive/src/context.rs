use std::any::TypeId;

use crate::runtime::RUNTIME;

/// Sets a context value under the current Scope.
///
/// The value is visible to the providing Scope and every descendant Scope,
/// and can be retrieved there with [use_context]. A value provided in a
/// deeper Scope shadows one of the same type provided higher up.
///
/// # Example
/// In a parent scope:
/// ```rust
/// # use matchmedia_reactive::provide_context;
/// provide_context(42);
/// provide_context(String::from("Hello world"));
/// ```
///
/// And in any descendant scope you can retrieve each context value by
/// specifying the type:
/// ```rust
/// # use matchmedia_reactive::use_context;
/// let foo: Option<i32> = use_context();
/// let bar: Option<String> = use_context();
/// ```
pub fn provide_context<T>(value: T)
where
    T: Clone + 'static,
{
    let ty = TypeId::of::<T>();

    RUNTIME.with(|runtime| {
        let scope = *runtime.current_scope.borrow();
        runtime
            .contexts
            .borrow_mut()
            .entry(scope)
            .or_default()
            .insert(ty, Box::new(value));
    });
}

/// Try to retrieve a context value stored with [provide_context], resolving
/// it by walking the Scope ownership chain upward from the current Scope.
/// Returns None when no ancestor Scope provided a value of this type.
pub fn use_context<T>() -> Option<T>
where
    T: Clone + 'static,
{
    let ty = TypeId::of::<T>();
    RUNTIME.with(|runtime| {
        let contexts = runtime.contexts.borrow();
        let parents = runtime.parents.borrow();
        let mut cursor = Some(*runtime.current_scope.borrow());
        while let Some(scope) = cursor {
            if let Some(value) = contexts.get(&scope).and_then(|values| values.get(&ty)) {
                return value.downcast_ref::<T>().cloned();
            }
            cursor = parents.get(&scope).copied();
        }
        None
    })
}
