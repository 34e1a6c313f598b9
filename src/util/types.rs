use std::any::TypeId;
use std::borrow::Cow;
use std::rc::Rc;
use std::sync::Arc;

/// Returns true if `x` is a signed integer; false otherwise.
///
/// | type            | isint |
/// |-----------------|-------|
/// | i8 .. i128      | true  |
/// | isize           | true  |
/// | u8 .. u128      | false |
/// | f32, f64        | false |
/// | bool            | false |
/// | char, str       | false |
///
/// The check is on the static type of the referent, so `isint(&&1)` is false.
///
/// ```
/// use numerox::util::isint;
/// assert!(isint(&1));
/// assert!(!isint(&1.1));
/// assert!(!isint(&true));
/// assert!(!isint("a"));
/// ```
pub fn isint<T: ?Sized + 'static>(_x: &T) -> bool {
    let id = TypeId::of::<T>();
    [
        TypeId::of::<i8>(),
        TypeId::of::<i16>(),
        TypeId::of::<i32>(),
        TypeId::of::<i64>(),
        TypeId::of::<i128>(),
        TypeId::of::<isize>(),
    ]
    .contains(&id)
}

/// Returns true if `s` is a string, owned or borrowed; false otherwise.
pub fn isstring<T: ?Sized + 'static>(_s: &T) -> bool {
    let id = TypeId::of::<T>();
    [
        TypeId::of::<str>(),
        TypeId::of::<String>(),
        TypeId::of::<Box<str>>(),
        TypeId::of::<Cow<'static, str>>(),
        TypeId::of::<Rc<str>>(),
        TypeId::of::<Arc<str>>(),
    ]
    .contains(&id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isint_signed_integers() {
        assert!(isint(&1));
        assert!(isint(&1i8));
        assert!(isint(&1i16));
        assert!(isint(&1i32));
        assert!(isint(&1i64));
        assert!(isint(&1i128));
        assert!(isint(&1isize));
    }

    #[test]
    fn test_isint_rejects_non_integers() {
        assert!(!isint(&1.1));
        assert!(!isint(&1.0f32));
        assert!(!isint(&true));
        assert!(!isint(&false));
        assert!(!isint("a"));
        assert!(!isint(&'a'));
        assert!(!isint(&String::from("1")));
        // complex number stand-in: (re, im)
        assert!(!isint(&(0.0f64, 1.0f64)));
    }

    #[test]
    fn test_isint_rejects_unsigned() {
        assert!(!isint(&1u8));
        assert!(!isint(&1u32));
        assert!(!isint(&1usize));
    }

    #[test]
    fn test_isstring() {
        assert!(isstring("a"));
        assert!(isstring(&String::from("a")));
        assert!(isstring(&Box::<str>::from("a")));
        assert!(isstring(&Cow::Borrowed("a")));
        assert!(isstring(&Arc::<str>::from("a")));
        assert!(isstring(&Rc::<str>::from("a")));
        assert!(!isstring(&1));
        assert!(!isstring(&'a'));
        assert!(!isstring(&vec!['a']));
    }
}
