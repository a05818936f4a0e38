//! Roll-ups holding the asset axis at its disaggregated values.
//!
//! For every disaggregated asset type this stage fills the all-industries
//! row and the legal-form/financing roll-up lattice. Owner-occupied housing
//! only ever crosses the industry axis through the businesses-plus-OOH pass.
use crate::aggregate::kernel::{joint_weighted_sum, weight_power};
use crate::cube::{Cube, CubeBuilder};
use crate::space::{FinancingSource, LegalForm, Perspective, SpaceRegistry, ROLLUP_PASSES};

/// Copy the disaggregated block through unchanged.
fn pass_through(space: &SpaceRegistry, var: &Cube, out: &mut CubeBuilder) {
    for i in space.all_industries() {
        for a in 0..space.assets() {
            for l in LegalForm::FOR_PROFIT {
                for f in FinancingSource::BASE {
                    for y in 0..space.years() {
                        out.set(i, a, l, f, y, var.at(i, a, l, f, y));
                    }
                }
            }
        }
    }
}

/// Comprehensive perspective: per-cell joint weights, denominator taken from
/// the aggregate weight at the output cell. Also the path used to aggregate
/// the weight cube itself (with unit weights every division is by one and
/// the roll-ups degenerate to plain sums).
pub(crate) fn comprehensive(space: &SpaceRegistry, var: &Cube, weights: &Cube) -> Cube {
    let ni = space.all_industries_slot();
    let biz_inds: Vec<usize> = space.business_industries().collect();
    let all_inds: Vec<usize> = space.all_industries().collect();
    let mix = &FinancingSource::TYPICAL_MIX[..];
    let years = space.years();

    let mut out = CubeBuilder::nan(space.shape());
    pass_through(space, var, &mut out);

    // Industry aggregates of the base columns. Owner-occupied housing never
    // joins the all-industries row, so the sum runs over business
    // industries; the OOH legal-form column falls out as 0/0.
    for a in 0..space.assets() {
        for l in LegalForm::FOR_PROFIT {
            for f in FinancingSource::BASE {
                for y in 0..years {
                    let num = joint_weighted_sum(var, weights, &biz_inds, &[a], &[l], &[f], y);
                    out.set(ni, a, l, f, y, num / weights.at(ni, a, l, f, y));
                }
            }
        }
    }

    for pass in ROLLUP_PASSES {
        let span: &[usize] = if pass.spans_ooh_industry {
            &all_inds
        } else {
            &biz_inds
        };

        for a in 0..space.assets() {
            // Legal-form roll-up within each industry row, and crossed with
            // the industry collapse.
            for f in FinancingSource::BASE {
                for y in 0..years {
                    for i in space.all_industries() {
                        let num =
                            joint_weighted_sum(var, weights, &[i], &[a], pass.forms, &[f], y);
                        out.set(i, a, pass.form_agg, f, y, num / weights.at(i, a, pass.form_agg, f, y));
                    }
                    let num = joint_weighted_sum(var, weights, span, &[a], pass.forms, &[f], y);
                    out.set(ni, a, pass.form_agg, f, y, num / weights.at(ni, a, pass.form_agg, f, y));
                }
            }

            // Financing roll-up per legal form, and crossed with the
            // industry collapse.
            for &l in pass.forms {
                for y in 0..years {
                    for i in space.all_industries() {
                        let num = joint_weighted_sum(var, weights, &[i], &[a], &[l], mix, y);
                        out.set(i, a, l, pass.fin_agg, y, num / weights.at(i, a, l, pass.fin_agg, y));
                    }
                    let num = joint_weighted_sum(var, weights, span, &[a], &[l], mix, y);
                    out.set(ni, a, l, pass.fin_agg, y, num / weights.at(ni, a, l, pass.fin_agg, y));
                }
            }

            // Legal form and financing collapsed together, by industry row
            // and for the all-industries row.
            for y in 0..years {
                for i in space.all_industries() {
                    let num = joint_weighted_sum(var, weights, &[i], &[a], pass.forms, mix, y);
                    out.set(
                        i,
                        a,
                        pass.form_agg,
                        pass.fin_agg,
                        y,
                        num / weights.at(i, a, pass.form_agg, pass.fin_agg, y),
                    );
                }
                let num = joint_weighted_sum(var, weights, span, &[a], pass.forms, mix, y);
                out.set(
                    ni,
                    a,
                    pass.form_agg,
                    pass.fin_agg,
                    y,
                    num / weights.at(ni, a, pass.form_agg, pass.fin_agg, y),
                );
            }
        }
    }

    out.freeze()
}

/// Tax-uniformity perspective: every collapse weighs its members with scalar
/// marginal weights read from the all-industries row of the reference asset
/// group, and the shared anchor weight is raised to the collapsed-axes power
/// in the denominator.
pub(crate) fn uniformity(space: &SpaceRegistry, var: &Cube, weights: &Cube) -> Cube {
    let ni = space.all_industries_slot();
    let ga = space.reference_slot();
    let biz_inds: Vec<usize> = space.business_industries().collect();
    let all_inds: Vec<usize> = space.all_industries().collect();
    let mix = FinancingSource::TYPICAL_MIX;
    let years = space.years();
    let u = Perspective::Uniformity;

    let mut out = CubeBuilder::nan(space.shape());
    pass_through(space, var, &mut out);

    // Industry aggregates of the base columns, businesses only; the OOH
    // column of the all-industries row stays NaN because owner-occupied
    // housing cannot be aggregated across industries.
    for a in 0..space.assets() {
        for l in [LegalForm::CCorp, LegalForm::PassThrough] {
            for f in FinancingSource::BASE {
                for y in 0..years {
                    let mut num = 0.0;
                    for &i in &biz_inds {
                        num += var.at(i, a, l, f, y)
                            * weights.at(i, ga, LegalForm::Businesses, FinancingSource::TypicalBiz, y);
                    }
                    let d = weights.at(ni, ga, LegalForm::Businesses, FinancingSource::TypicalBiz, y);
                    out.set(ni, a, l, f, y, num / d.powi(weight_power(u, 1)));
                }
            }
        }
    }

    for pass in ROLLUP_PASSES {
        let span: &[usize] = if pass.spans_ooh_industry {
            &all_inds
        } else {
            &biz_inds
        };

        for a in 0..space.assets() {
            for y in 0..years {
                let anchor = weights.at(ni, ga, pass.form_agg, pass.fin_agg, y);

                // Legal-form roll-up within each industry row.
                for &i in span {
                    for f in FinancingSource::BASE {
                        let mut num = 0.0;
                        for &l in pass.forms {
                            num += var.at(i, a, l, f, y) * weights.at(ni, ga, l, pass.fin_agg, y);
                        }
                        out.set(i, a, pass.form_agg, f, y, num / anchor.powi(weight_power(u, 1)));
                    }
                }

                // Financing roll-up per legal form within each industry row.
                for &i in span {
                    for &l in pass.forms {
                        let mut num = 0.0;
                        for f in mix {
                            num += var.at(i, a, l, f, y) * weights.at(ni, ga, pass.form_agg, f, y);
                        }
                        out.set(i, a, l, pass.fin_agg, y, num / anchor.powi(weight_power(u, 1)));
                    }
                }

                // Legal form and financing collapsed together.
                for &i in span {
                    let mut num = 0.0;
                    for &l in pass.forms {
                        for f in mix {
                            num += var.at(i, a, l, f, y)
                                * weights.at(ni, ga, l, pass.fin_agg, y)
                                * weights.at(ni, ga, pass.form_agg, f, y);
                        }
                    }
                    out.set(
                        i,
                        a,
                        pass.form_agg,
                        pass.fin_agg,
                        y,
                        num / anchor.powi(weight_power(u, 2)),
                    );
                }

                // Industry and financing collapsed together.
                for &l in pass.forms {
                    let mut num = 0.0;
                    for &i in span {
                        for f in mix {
                            num += var.at(i, a, l, f, y)
                                * weights.at(i, ga, pass.form_agg, pass.fin_agg, y)
                                * weights.at(ni, ga, pass.form_agg, f, y);
                        }
                    }
                    out.set(ni, a, l, pass.fin_agg, y, num / anchor.powi(weight_power(u, 2)));
                }

                // Industry and legal form collapsed together.
                for f in FinancingSource::BASE {
                    let mut num = 0.0;
                    for &i in span {
                        for &l in pass.forms {
                            num += var.at(i, a, l, f, y)
                                * weights.at(i, ga, pass.form_agg, pass.fin_agg, y)
                                * weights.at(ni, ga, l, pass.fin_agg, y);
                        }
                    }
                    out.set(ni, a, pass.form_agg, f, y, num / anchor.powi(weight_power(u, 2)));
                }

                // Industry, legal form, and financing collapsed together.
                let mut num = 0.0;
                for &i in span {
                    for &l in pass.forms {
                        for f in mix {
                            num += var.at(i, a, l, f, y)
                                * weights.at(i, ga, pass.form_agg, pass.fin_agg, y)
                                * weights.at(ni, ga, l, pass.fin_agg, y)
                                * weights.at(ni, ga, pass.form_agg, f, y);
                        }
                    }
                }
                out.set(
                    ni,
                    a,
                    pass.form_agg,
                    pass.fin_agg,
                    y,
                    num / anchor.powi(weight_power(u, 3)),
                );
            }
        }
    }

    out.freeze()
}
