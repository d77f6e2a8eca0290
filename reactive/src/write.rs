use crate::id::Id;

pub trait SignalUpdate<T> {
    /// get the Signal Id
    fn id(&self) -> Id;

    /// Sets the new_value to the Signal and triggers effect runs
    fn set(&self, new_value: T)
    where
        T: 'static,
    {
        if let Some(signal) = self.id().signal() {
            signal.update_value(|v| *v = new_value);
        }
    }

    /// Update the stored value with the given function and triggers effect
    /// runs
    fn update(&self, f: impl FnOnce(&mut T))
    where
        T: 'static,
    {
        if let Some(signal) = self.id().signal() {
            signal.update_value(f);
        }
    }

    /// Update the stored value with the given function, triggers effect
    /// runs, and returns the value returned by the function. Returns None if
    /// the Signal is already disposed.
    fn try_update<O>(&self, f: impl FnOnce(&mut T) -> O) -> Option<O>
    where
        T: 'static,
    {
        self.id().signal().map(|signal| signal.update_value(f))
    }
}
