//! Constant generators for the usual "sequential keys, one bit per capability" layout.

/// Declares sequential [`GroupKey`](crate::GroupKey) constants starting at `0`.
///
/// ```rust
/// gpm::group_keys!(WRITE_KEY, READ_KEY);
///
/// assert_eq!(WRITE_KEY.get(), 0);
/// assert_eq!(READ_KEY.get(), 1);
/// ```
#[macro_export]
macro_rules! group_keys {
    (@next [$vis:vis] $value:expr;) => {};
    (@next [$vis:vis] $value:expr; $name:ident $(, $rest:ident)*) => {
        $vis const $name: $crate::GroupKey = $crate::GroupKey::new($value);
        $crate::group_keys!(@next [$vis] $value + 1; $($rest),*);
    };
    ($vis:vis $($name:ident),+ $(,)?) => {
        $crate::group_keys!(@next [$vis] 0; $($name),+);
    };
}

/// Declares sequential single-bit [`Permission`](crate::Permission) constants:
/// the first name is `1 << 0`, the next `1 << 1`, and so on.
///
/// Each group normally gets its own invocation, so bit `0` of one group is
/// unrelated to bit `0` of another. More than 64 names in one invocation
/// fails to compile.
///
/// ```rust
/// gpm::permissions!(READ_NAME, READ_LAST_NAME, READ_EMAIL);
///
/// assert_eq!(READ_NAME.bits(), 0b001);
/// assert_eq!(READ_EMAIL.bits(), 0b100);
/// assert!((READ_NAME | READ_LAST_NAME).contains(READ_LAST_NAME));
/// ```
#[macro_export]
macro_rules! permissions {
    (@next [$vis:vis] $shift:expr;) => {};
    (@next [$vis:vis] $shift:expr; $name:ident $(, $rest:ident)*) => {
        $vis const $name: $crate::Permission = $crate::Permission::bit($shift);
        $crate::permissions!(@next [$vis] $shift + 1; $($rest),*);
    };
    ($vis:vis $($name:ident),+ $(,)?) => {
        $crate::permissions!(@next [$vis] 0; $($name),+);
    };
}

#[cfg(test)]
mod tests {
    use crate::{GroupKey, Permission};

    crate::group_keys!(WRITE_KEY, READ_KEY, ADMIN_KEY,);
    crate::permissions!(WRITE_NAME, WRITE_LAST_NAME);
    crate::permissions!(READ_NAME, READ_LAST_NAME, READ_EMAIL);

    #[test]
    fn keys_are_sequential_from_zero() {
        assert_eq!(WRITE_KEY, GroupKey::new(0));
        assert_eq!(READ_KEY, GroupKey::new(1));
        assert_eq!(ADMIN_KEY, GroupKey::new(2));
    }

    #[test]
    fn permissions_are_sequential_single_bits() {
        assert_eq!(WRITE_NAME, Permission::from(0b01));
        assert_eq!(WRITE_LAST_NAME, Permission::from(0b10));
        assert_eq!(READ_NAME, Permission::from(0b001));
        assert_eq!(READ_LAST_NAME, Permission::from(0b010));
        assert_eq!(READ_EMAIL, Permission::from(0b100));
    }

    #[test]
    fn each_invocation_restarts_at_bit_zero() {
        assert_eq!(WRITE_NAME.bits(), READ_NAME.bits());
    }
}
