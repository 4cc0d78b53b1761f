//! Response-spectrum modal combination
//!
//! Pure functions from modal results and a spectrum to combined demands.
//! The only state is an optional [`SpectrumCache`] owned by the caller.

mod combination;
mod spectrum;

pub use combination::{
    abs_combination, combine_directional, combine_member_demands, combine_modal, combine_node_demands,
    cqc_combination, cross_modal_damping_coefficient, modal_response_scale, srss_combination,
};
pub use spectrum::{interpolate_spectrum, ResponseSpectrum, SpectrumCache, SpectrumParameters, SpectrumPoint};
