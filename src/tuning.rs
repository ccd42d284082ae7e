//! The surface shared by all scale generators.

use crate::microtone::MicrotoneArray;

/// Pull interface exposed by every generator to its host collaborators.
///
/// Hosts read the processed scale after pushing parameters through the
/// generator-specific setters. [`Tuning::parameter_description`] is consumed
/// verbatim by persistence layers and must therefore be stable given
/// identical parameters.
pub trait Tuning {
    /// The processed scale: octave-reduced, sorted and (depending on the
    /// generator) uniquified.
    fn processed(&self) -> &MicrotoneArray;

    /// The processed scale after the optional notes-per-octave override.
    /// Equals [`Tuning::processed`] while the override is disabled.
    fn processed_npo(&self) -> &MicrotoneArray;

    /// A short human-readable summary of the current parameters.
    fn parameter_description(&self) -> String;
}

/// Callback invoked synchronously at the end of any recompute.
///
/// The engine makes no assumption about what the callback does and tolerates
/// it being unset. It is never invoked from a background thread; there is no
/// background thread anywhere in this crate.
pub type UpdateCallback = Box<dyn FnMut()>;

pub(crate) fn notify(callback: &mut Option<UpdateCallback>) {
    if let Some(callback) = callback {
        callback();
    }
}
