// Copyright (c) 2024 The bonemux developers
//
// Permission is hereby granted, free of charge, to any person obtaining a
// copy of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation
// the rights to use, copy, modify, merge, publish, distribute, sublicense,
// and/or sell copies of the Software, and to permit persons to whom the
// Software is furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL
// THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
// FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
// DEALINGS IN THE SOFTWARE.

use std::fmt;
use std::num::NonZeroU32;

/// Key returned by [`PinMux::lock`], required to unlock the pin again.
///
/// Keys are random and never zero. They're opaque on purpose: the only way to
/// obtain a valid key is to lock the pin.
///
/// [`PinMux::lock`]: struct.PinMux.html#method.lock
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub struct LockKey(NonZeroU32);

impl LockKey {
    fn generate() -> LockKey {
        loop {
            if let Some(key) = NonZeroU32::new(rand::random::<u32>()) {
                return LockKey(key);
            }
        }
    }
}

impl fmt::Display for LockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0.get())
    }
}

// Ownership of a single pin's mux setting.
#[derive(Debug)]
pub(crate) enum LockState {
    Unlocked,
    Locked {
        owner: String,
        key: LockKey,
    },
}

impl Default for LockState {
    fn default() -> LockState {
        LockState::Unlocked
    }
}

impl LockState {
    pub(crate) fn is_locked(&self) -> bool {
        matches!(self, LockState::Locked { .. })
    }

    pub(crate) fn owner(&self) -> Option<&str> {
        match self {
            LockState::Locked { owner, .. } => Some(owner),
            LockState::Unlocked => None,
        }
    }

    // Returns the current owner if the pin is already locked.
    pub(crate) fn lock(&mut self, owner: &str) -> Result<LockKey, String> {
        if let LockState::Locked { owner: current, .. } = self {
            return Err(current.clone());
        }

        let owner = if owner.is_empty() { "(unknown)" } else { owner };
        let key = LockKey::generate();
        *self = LockState::Locked {
            owner: owner.to_owned(),
            key,
        };

        Ok(key)
    }

    // Returns false, leaving the state untouched, if `key` doesn't match.
    pub(crate) fn unlock(&mut self, key: LockKey) -> bool {
        match self {
            LockState::Locked { key: current, .. } if *current == key => {
                *self = LockState::Unlocked;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_and_unlock() {
        let mut state = LockState::default();
        assert!(!state.is_locked());

        let key = state.lock("owner-A").unwrap();
        assert!(state.is_locked());
        assert_eq!(state.owner(), Some("owner-A"));

        assert!(state.unlock(key));
        assert!(!state.is_locked());
        assert_eq!(state.owner(), None);
    }

    #[test]
    fn second_lock_fails_for_any_owner() {
        let mut state = LockState::default();
        let _key = state.lock("owner-A").unwrap();

        assert_eq!(state.lock("owner-A"), Err("owner-A".to_owned()));
        assert_eq!(state.lock("owner-B"), Err("owner-A".to_owned()));
        assert_eq!(state.owner(), Some("owner-A"));
    }

    #[test]
    fn wrong_key_leaves_lock_in_place() {
        let mut state = LockState::default();
        let key = state.lock("owner-A").unwrap();

        let mut other = LockState::default();
        let mut wrong = other.lock("owner-B").unwrap();
        while wrong == key {
            other = LockState::default();
            wrong = other.lock("owner-B").unwrap();
        }

        assert!(!state.unlock(wrong));
        assert!(state.is_locked());
        assert!(state.unlock(key));
    }

    #[test]
    fn unlocking_an_unlocked_pin_fails() {
        let mut state = LockState::default();
        let key = LockKey::generate();

        assert!(!state.unlock(key));
        assert!(!state.is_locked());
    }

    #[test]
    fn empty_owner_is_replaced() {
        let mut state = LockState::default();
        state.lock("").unwrap();

        assert_eq!(state.owner(), Some("(unknown)"));
    }
}
