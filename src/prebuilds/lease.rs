//
//  bbs-prebuilds
//  prebuilds/lease.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Per-repository mutual exclusion for installations in this process.
///
/// Holding the guard returned by [`acquire`](Self::acquire) for a key keeps
/// every other installer of the same key waiting. Locks nobody holds are
/// dropped from the table on the next acquisition.
#[derive(Default)]
pub struct InstallLeases {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl InstallLeases {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.retain(|k, lock| k == key || Arc::strong_count(lock) > 1);
            locks.entry(key.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Number of keys currently tracked.
    pub async fn tracked(&self) -> usize {
        self.locks.lock().await.len()
    }
}
