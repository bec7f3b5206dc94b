//! 统计信息

use super::Entity;

/// 信道单方向的计数器
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirStats {
    pub transmitted: u64,
    pub lost: u64,
    pub corrupted: u64,
    pub arrived: u64,
}

#[derive(Debug, Default, Clone)]
pub struct Stats {
    /// 数据方向（A -> B）
    pub a_to_b: DirStats,
    /// ACK 方向（B -> A）
    pub b_to_a: DirStats,
    /// A 端应用提交的消息数
    pub app_sent: u64,
    /// 交付给 B 端应用的消息数，只增不减
    pub delivered_msgs: u64,
    pub timer_starts: u64,
    pub timer_fires: u64,
    /// 执行后发送窗口不变量不成立的事件数
    pub window_violations: u64,
}

impl Stats {
    pub fn dir(&self, from: Entity) -> &DirStats {
        match from {
            Entity::A => &self.a_to_b,
            Entity::B => &self.b_to_a,
        }
    }

    pub(crate) fn dir_mut(&mut self, from: Entity) -> &mut DirStats {
        match from {
            Entity::A => &mut self.a_to_b,
            Entity::B => &mut self.b_to_a,
        }
    }
}
