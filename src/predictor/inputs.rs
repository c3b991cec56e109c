use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

/// A request's raw feature values, looked up by feature name.
///
/// Values are untyped strings as they arrive from a form, query string or
/// command line. Keys the model does not use are ignored by the predictor.
pub trait RawInputs {
    fn raw_value(&self, name: &str) -> Option<&str>;
}

impl<T: RawInputs + ?Sized> RawInputs for &T {
    fn raw_value(&self, name: &str) -> Option<&str> {
        (**self).raw_value(name)
    }
}

impl<K, V, S> RawInputs for HashMap<K, V, S>
where
    K: Borrow<str> + Hash + Eq,
    V: AsRef<str>,
    S: BuildHasher,
{
    fn raw_value(&self, name: &str) -> Option<&str> {
        self.get(name).map(AsRef::as_ref)
    }
}

impl<K, V> RawInputs for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
    V: AsRef<str>,
{
    fn raw_value(&self, name: &str) -> Option<&str> {
        self.get(name).map(AsRef::as_ref)
    }
}

/// The first pair with a matching key wins.
impl<K, V> RawInputs for [(K, V)]
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    fn raw_value(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_ref())
    }
}

impl<K, V> RawInputs for Vec<(K, V)>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    fn raw_value(&self, name: &str) -> Option<&str> {
        self.as_slice().raw_value(name)
    }
}
