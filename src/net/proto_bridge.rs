//! Access to the protocol endpoints from inside an event.

use crate::proto::{ReceiverEngine, SenderEngine};
use crate::sim::{Simulator, World};

use super::{NetCtx, NetWorld};

/// Split the world into the environment and the two engines so an event can
/// call into an engine while the engine calls back into the network.
pub(crate) fn with_endpoints<F, R>(world: &mut dyn World, sim: &mut Simulator, f: F) -> R
where
    F: FnOnce(&mut NetCtx<'_>, &mut dyn SenderEngine, &mut dyn ReceiverEngine) -> R,
{
    let w = world
        .as_any_mut()
        .downcast_mut::<NetWorld>()
        .expect("world must be NetWorld");
    let NetWorld {
        net,
        sender,
        receiver,
    } = w;
    let mut ctx = NetCtx { net, sim };
    f(&mut ctx, sender.as_mut(), receiver.as_mut())
}
