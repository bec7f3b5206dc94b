//! 端点标识

use std::fmt;

use serde::{Deserialize, Serialize};

/// 单向传输的一端：A 发送数据，B 接收数据。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Entity {
    A,
    B,
}

impl Entity {
    pub(crate) fn index(self) -> usize {
        match self {
            Entity::A => 0,
            Entity::B => 1,
        }
    }

    /// 对端
    pub fn peer(self) -> Entity {
        match self {
            Entity::A => Entity::B,
            Entity::B => Entity::A,
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::A => f.write_str("A"),
            Entity::B => f.write_str("B"),
        }
    }
}
