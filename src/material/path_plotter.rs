use super::PathRecord;
use crate::StrError;
use plotpy::{Curve, Plot};
use std::ffi::OsStr;

/// Plots the results along a strain path
///
/// The figure has four panels: axial stress versus axial strain and the time
/// histories of the axial stress, the equivalent plastic strain, and the damage.
/// The axial direction is the first Mandel component (xx).
pub fn plot_strain_path<P>(records: &[PathRecord], full_path: &P) -> Result<(), StrError>
where
    P: AsRef<OsStr> + ?Sized,
{
    if records.is_empty() {
        return Err("there are no records to plot");
    }
    let t: Vec<_> = records.iter().map(|r| r.t).collect();
    let eps_xx: Vec<_> = records.iter().map(|r| -r.strain.vector()[0]).collect();
    let sig_xx: Vec<_> = records.iter().map(|r| -r.stress.vector()[0]).collect();
    let eps_p_eff: Vec<_> = records.iter().map(|r| r.eps_p_eff).collect();
    let damage: Vec<_> = records.iter().map(|r| r.damage).collect();

    let mut plot = Plot::new();
    let panels = [
        (&eps_xx, &sig_xx, "$-\\varepsilon_{xx}$", "$-\\sigma_{xx}$"),
        (&t, &sig_xx, "$t$", "$-\\sigma_{xx}$"),
        (&t, &eps_p_eff, "$t$", "$\\varepsilon^p_{eff}$"),
        (&t, &damage, "$t$", "$D$"),
    ];
    for (index, (x, y, x_label, y_label)) in panels.iter().enumerate() {
        let mut curve = Curve::new();
        curve.set_marker_style(".").draw(*x, *y);
        plot.set_subplot(2, 2, index + 1)
            .add(&curve)
            .grid_and_labels(x_label, y_label);
    }
    plot.set_figure_size_points(600.0, 450.0).save(full_path)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
