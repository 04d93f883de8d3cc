// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scoped, forward-only generator sessions.

use crate::host::{ContainerGenerator, ContainerKind};
use crate::realization::RecyclePool;

/// A container handed out by a [`GeneratorSession`].
#[derive(Debug)]
pub struct Generated<C> {
    /// The container.
    pub container: C,
    /// `true` if the container was freshly created rather than taken from the pool.
    pub is_new: bool,
}

/// A forward cursor over item indices backed by a [`ContainerGenerator`].
///
/// Opening a session calls [`ContainerGenerator::begin_session`]; dropping it
/// calls [`ContainerGenerator::end_session`], on every exit path.
#[derive(Debug)]
pub struct GeneratorSession<'a, G: ContainerGenerator + ?Sized> {
    generator: &'a mut G,
    position: usize,
}

impl<'a, G: ContainerGenerator + ?Sized> GeneratorSession<'a, G> {
    /// Opens a session positioned at `start`.
    pub fn open(generator: &'a mut G, start: usize) -> Self {
        generator.begin_session(start);
        Self {
            generator,
            position: start,
        }
    }

    /// Index the next call to [`GeneratorSession::next`] or
    /// [`GeneratorSession::skip`] refers to.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// The underlying generator.
    pub fn generator(&mut self) -> &mut G {
        self.generator
    }

    /// Moves past the current index without producing a container.
    pub fn skip(&mut self) {
        self.position += 1;
    }

    /// Produces a container for the current index and advances.
    ///
    /// A pooled container of the matching kind is preferred over creating a
    /// new one. Returns `None` if the host cannot produce a container.
    pub fn next(&mut self, pool: &mut RecyclePool<G::Container>) -> Option<Generated<G::Container>> {
        let index = self.position;
        self.position += 1;
        let kind: ContainerKind = self.generator.container_kind(index);
        if let Some(container) = pool.take(kind) {
            return Some(Generated {
                container,
                is_new: false,
            });
        }
        self.generator.create(index).map(|container| Generated {
            container,
            is_new: true,
        })
    }
}

impl<G: ContainerGenerator + ?Sized> Drop for GeneratorSession<'_, G> {
    fn drop(&mut self) {
        self.generator.end_session();
    }
}

#[cfg(test)]
mod tests {
    use super::GeneratorSession;
    use crate::host::ContainerKind;
    use crate::realization::RecyclePool;
    use crate::test_support::MockHost;

    #[test]
    fn session_is_closed_on_drop() {
        let mut host = MockHost::new(10);
        {
            let session = GeneratorSession::open(&mut host, 3);
            assert_eq!(session.position(), 3);
        }
        assert_eq!(host.sessions_opened, 1);
        assert_eq!(host.sessions_closed, 1);
    }

    #[test]
    fn session_is_closed_on_early_return() {
        fn first_failure(host: &mut MockHost) -> Option<usize> {
            let mut pool = RecyclePool::new();
            let mut session = GeneratorSession::open(host, 0);
            loop {
                let index = session.position();
                session.next(&mut pool)?;
                if index > 20 {
                    return None;
                }
            }
        }
        let mut host = MockHost::new(10);
        host.fail_on.push(2);
        assert_eq!(first_failure(&mut host), None);
        assert_eq!(host.sessions_closed, 1);
        assert_eq!(host.created, 2);
    }

    #[test]
    fn pooled_containers_are_preferred() {
        let mut host = MockHost::new(10);
        let mut pool = RecyclePool::new();
        let recycled = host.fresh_container();
        pool.push(ContainerKind::default(), recycled);

        let mut session = GeneratorSession::open(&mut host, 0);
        let first = session.next(&mut pool).unwrap();
        assert!(!first.is_new);
        let second = session.next(&mut pool).unwrap();
        assert!(second.is_new);
        assert_eq!(session.position(), 2);
    }
}
