//! Roll-ups into the named asset-group slots.
//!
//! Each group collapses the asset axis over its members, crossed with the
//! same legal-form/financing lattice as the by-asset-type stage and with the
//! industry collapse. The owner-occupied housing row follows a three-branch
//! fallback: the OOH stock is residential buildings plus land, so a group
//! covering both aggregates that pair, a group covering only residential
//! buildings passes that cell through, and any other group has no OOH value.
use crate::aggregate::kernel::{joint_weighted_sum, weight_power};
use crate::cube::{Cube, CubeBuilder};
use crate::space::{
    FinancingSource, LegalForm, OohCoverage, Perspective, SpaceRegistry, ROLLUP_PASSES,
};

const BIZ_FORMS: [LegalForm; 2] = [LegalForm::CCorp, LegalForm::PassThrough];

/// Comprehensive perspective over every asset group.
pub(crate) fn comprehensive(space: &SpaceRegistry, var: &Cube, weights: &Cube) -> Cube {
    let ni = space.all_industries_slot();
    let biz_inds: Vec<usize> = space.business_industries().collect();
    let all_inds: Vec<usize> = space.all_industries().collect();
    let mix = &FinancingSource::TYPICAL_MIX[..];
    let years = space.years();

    let mut out = CubeBuilder::nan(space.shape());

    for (g, group) in space.groups().iter().enumerate() {
        let slot = space.group_slot(g);
        let members: Vec<usize> = group.member_indices().collect();

        // Asset collapse within each industry row, then crossed with the
        // industry collapse for the base columns.
        for l in LegalForm::FOR_PROFIT {
            for f in FinancingSource::BASE {
                for y in 0..years {
                    for i in space.all_industries() {
                        let num =
                            joint_weighted_sum(var, weights, &[i], &members, &[l], &[f], y);
                        out.set(i, slot, l, f, y, num / weights.at(i, slot, l, f, y));
                    }
                    let num = joint_weighted_sum(var, weights, &biz_inds, &members, &[l], &[f], y);
                    out.set(ni, slot, l, f, y, num / weights.at(ni, slot, l, f, y));
                }
            }
        }

        for pass in ROLLUP_PASSES {
            let span: &[usize] = if pass.spans_ooh_industry {
                &all_inds
            } else {
                &biz_inds
            };

            // Asset and legal form collapsed.
            for f in FinancingSource::BASE {
                for y in 0..years {
                    for i in space.all_industries() {
                        let num =
                            joint_weighted_sum(var, weights, &[i], &members, pass.forms, &[f], y);
                        out.set(i, slot, pass.form_agg, f, y, num / weights.at(i, slot, pass.form_agg, f, y));
                    }
                    let num = joint_weighted_sum(var, weights, span, &members, pass.forms, &[f], y);
                    out.set(ni, slot, pass.form_agg, f, y, num / weights.at(ni, slot, pass.form_agg, f, y));
                }
            }

            // Asset and financing collapsed, per legal form.
            for &l in pass.forms {
                for y in 0..years {
                    for i in space.all_industries() {
                        let num = joint_weighted_sum(var, weights, &[i], &members, &[l], mix, y);
                        out.set(i, slot, l, pass.fin_agg, y, num / weights.at(i, slot, l, pass.fin_agg, y));
                    }
                    let num = joint_weighted_sum(var, weights, span, &members, &[l], mix, y);
                    out.set(ni, slot, l, pass.fin_agg, y, num / weights.at(ni, slot, l, pass.fin_agg, y));
                }
            }

            // Asset, legal form, and financing collapsed.
            for y in 0..years {
                for i in space.all_industries() {
                    let num = joint_weighted_sum(var, weights, &[i], &members, pass.forms, mix, y);
                    out.set(
                        i,
                        slot,
                        pass.form_agg,
                        pass.fin_agg,
                        y,
                        num / weights.at(i, slot, pass.form_agg, pass.fin_agg, y),
                    );
                }
                let num = joint_weighted_sum(var, weights, span, &members, pass.forms, mix, y);
                out.set(
                    ni,
                    slot,
                    pass.form_agg,
                    pass.fin_agg,
                    y,
                    num / weights.at(ni, slot, pass.form_agg, pass.fin_agg, y),
                );
            }
        }
    }

    out.freeze()
}

/// Tax-uniformity perspective over every asset group.
///
/// Marginal weight factors come from the all-industries row: per-asset
/// factors at the disaggregated asset types, per-industry factors at the
/// group's own slot, and the group-slot anchor weight carries the
/// collapsed-axes power in the denominator.
pub(crate) fn uniformity(space: &SpaceRegistry, var: &Cube, weights: &Cube) -> Cube {
    let ni = space.all_industries_slot();
    let ooh = space.ooh_industry();
    let biz_inds: Vec<usize> = space.business_industries().collect();
    let mix = FinancingSource::TYPICAL_MIX;
    let years = space.years();
    let u = Perspective::Uniformity;
    let biz = LegalForm::Businesses;
    let biz_ooh = LegalForm::BusinessesPlusOoh;
    let ooh_form = LegalForm::OwnerOccupiedHousing;
    let typ_biz = FinancingSource::TypicalBiz;
    let typ_biz_ooh = FinancingSource::TypicalBizOoh;

    let mut out = CubeBuilder::nan(space.shape());

    for (g, group) in space.groups().iter().enumerate() {
        let slot = space.group_slot(g);
        let members: Vec<usize> = group.member_indices().collect();
        let coverage = space.ooh_coverage(group);
        let ooh_assets = space.ooh_assets();
        let residential = space.residential_buildings();

        // Asset collapse within each business industry row.
        for &i in &biz_inds {
            for l in BIZ_FORMS {
                for f in FinancingSource::BASE {
                    for y in 0..years {
                        let mut num = 0.0;
                        for &a in &members {
                            num += var.at(i, a, l, f, y) * weights.at(ni, a, biz, typ_biz, y);
                        }
                        let d = weights.at(ni, slot, biz, typ_biz, y);
                        out.set(i, slot, l, f, y, num / d.powi(weight_power(u, 1)));
                    }
                }
            }
        }

        // Asset collapse for the owner-occupied housing row.
        match coverage {
            OohCoverage::Pair => {
                for f in FinancingSource::BASE {
                    for y in 0..years {
                        let mut num = 0.0;
                        let mut den = 0.0;
                        for &a in &ooh_assets {
                            let w = weights.at(ni, a, biz_ooh, typ_biz_ooh, y);
                            num += var.at(ooh, a, ooh_form, f, y) * w;
                            den += w;
                        }
                        out.set(ooh, slot, ooh_form, f, y, num / den);
                    }
                }
            }
            OohCoverage::ResidentialOnly => {
                for f in FinancingSource::BASE {
                    for y in 0..years {
                        out.set(ooh, slot, ooh_form, f, y, var.at(ooh, residential, ooh_form, f, y));
                    }
                }
            }
            OohCoverage::None => {}
        }

        // Asset and financing collapsed, per business industry and form.
        for pass in ROLLUP_PASSES {
            for &i in &biz_inds {
                for l in BIZ_FORMS {
                    for y in 0..years {
                        let mut num = 0.0;
                        for &a in &members {
                            for f in mix {
                                num += var.at(i, a, l, f, y)
                                    * weights.at(ni, a, pass.form_agg, pass.fin_agg, y)
                                    * weights.at(ni, slot, pass.form_agg, f, y);
                            }
                        }
                        let d = weights.at(ni, slot, pass.form_agg, pass.fin_agg, y);
                        out.set(i, slot, l, pass.fin_agg, y, num / d.powi(weight_power(u, 2)));
                    }
                }
            }
        }

        // Asset and financing collapsed for the owner-occupied housing row.
        match coverage {
            OohCoverage::Pair => {
                for y in 0..years {
                    let mut num = 0.0;
                    let mut pair_weight = 0.0;
                    for &a in &ooh_assets {
                        let w = weights.at(ni, a, biz_ooh, typ_biz_ooh, y);
                        pair_weight += w;
                        for f in mix {
                            num += var.at(ooh, a, ooh_form, f, y)
                                * w
                                * weights.at(ni, slot, biz_ooh, f, y);
                        }
                    }
                    let den = pair_weight * weights.at(ni, slot, biz_ooh, typ_biz_ooh, y);
                    out.set(ooh, slot, ooh_form, typ_biz_ooh, y, num / den);
                }
            }
            OohCoverage::ResidentialOnly => {
                for y in 0..years {
                    let mut num = 0.0;
                    for f in mix {
                        num += var.at(ooh, residential, ooh_form, f, y)
                            * weights.at(ni, slot, biz_ooh, f, y);
                    }
                    let den = weights.at(ni, slot, biz_ooh, typ_biz_ooh, y);
                    out.set(ooh, slot, ooh_form, typ_biz_ooh, y, num / den);
                }
            }
            OohCoverage::None => {}
        }

        // Asset and legal form collapsed; the business mix fills both
        // roll-up rows since only business forms exist below the industry
        // collapse.
        for form_row in [biz, biz_ooh] {
            for &i in &biz_inds {
                for f in FinancingSource::BASE {
                    for y in 0..years {
                        let mut num = 0.0;
                        for &a in &members {
                            for l in BIZ_FORMS {
                                num += var.at(i, a, l, f, y)
                                    * weights.at(ni, a, biz, typ_biz, y)
                                    * weights.at(ni, slot, l, typ_biz, y);
                            }
                        }
                        let d = weights.at(ni, slot, biz, typ_biz, y);
                        out.set(i, slot, form_row, f, y, num / d.powi(weight_power(u, 2)));
                    }
                }
            }
        }

        // Asset, legal form, and financing collapsed, per business industry.
        for pass in ROLLUP_PASSES {
            for &i in &biz_inds {
                for y in 0..years {
                    let mut num = 0.0;
                    for &a in &members {
                        for l in BIZ_FORMS {
                            for f in mix {
                                num += var.at(i, a, l, f, y)
                                    * weights.at(ni, a, biz, typ_biz, y)
                                    * weights.at(ni, slot, l, typ_biz, y)
                                    * weights.at(ni, slot, biz, f, y);
                            }
                        }
                    }
                    let d = weights.at(ni, slot, biz, typ_biz, y);
                    out.set(
                        i,
                        slot,
                        pass.form_agg,
                        pass.fin_agg,
                        y,
                        num / d.powi(weight_power(u, 3)),
                    );
                }
            }
        }

        // Industry and asset collapsed, base columns; owner-occupied housing
        // is excluded, so the OOH legal-form column stays NaN.
        for l in BIZ_FORMS {
            for f in FinancingSource::BASE {
                for y in 0..years {
                    let mut num = 0.0;
                    for &i in &biz_inds {
                        for &a in &members {
                            num += var.at(i, a, l, f, y)
                                * weights.at(ni, a, biz, typ_biz, y)
                                * weights.at(i, slot, biz, typ_biz, y);
                        }
                    }
                    let d = weights.at(ni, slot, biz, typ_biz, y);
                    out.set(ni, slot, l, f, y, num / d.powi(weight_power(u, 2)));
                }
            }
        }

        // Industry, asset, and financing collapsed.
        for pass in ROLLUP_PASSES {
            for l in BIZ_FORMS {
                for y in 0..years {
                    let mut num = 0.0;
                    for &i in &biz_inds {
                        for &a in &members {
                            for f in mix {
                                num += var.at(i, a, l, f, y)
                                    * weights.at(ni, a, pass.form_agg, pass.fin_agg, y)
                                    * weights.at(i, slot, pass.form_agg, pass.fin_agg, y)
                                    * weights.at(ni, slot, pass.form_agg, f, y);
                            }
                        }
                    }
                    let d = weights.at(ni, slot, pass.form_agg, pass.fin_agg, y);
                    out.set(ni, slot, l, pass.fin_agg, y, num / d.powi(weight_power(u, 3)));
                }
            }
        }

        // Industry, asset, and legal form collapsed.
        for f in FinancingSource::BASE {
            for y in 0..years {
                let mut num = 0.0;
                for &i in &biz_inds {
                    for &a in &members {
                        for l in BIZ_FORMS {
                            num += var.at(i, a, l, f, y)
                                * weights.at(ni, a, biz, typ_biz, y)
                                * weights.at(i, slot, biz, typ_biz, y)
                                * weights.at(ni, slot, l, typ_biz, y);
                        }
                    }
                }
                let d = weights.at(ni, slot, biz, typ_biz, y);
                out.set(ni, slot, biz, f, y, num / d.powi(weight_power(u, 3)));
            }
        }

        // The businesses-plus-OOH row blends the business aggregate with the
        // OOH row using actual cell weights when the group reaches the OOH
        // stock; otherwise it repeats the business aggregate.
        if space.touches_ooh_assets(group) {
            for f in FinancingSource::BASE {
                for y in 0..years {
                    let blended = (out.at(ni, slot, biz, f, y) * weights.at(ni, slot, biz, f, y)
                        + out.at(ooh, slot, ooh_form, f, y) * weights.at(ooh, slot, ooh_form, f, y))
                        / weights.at(ni, slot, biz_ooh, f, y);
                    out.set(ni, slot, biz_ooh, f, y, blended);
                }
            }
        } else {
            for f in FinancingSource::BASE {
                for y in 0..years {
                    let repeated = out.at(ni, slot, biz, f, y);
                    out.set(ni, slot, biz_ooh, f, y, repeated);
                }
            }
        }

        // Everything collapsed at once: the grand business cell, then its
        // businesses-plus-OOH counterpart.
        for y in 0..years {
            let mut num = 0.0;
            for &i in &biz_inds {
                for &a in &members {
                    for l in BIZ_FORMS {
                        for f in mix {
                            num += var.at(i, a, l, f, y)
                                * weights.at(ni, a, biz, typ_biz, y)
                                * weights.at(i, slot, biz, typ_biz, y)
                                * weights.at(ni, slot, l, typ_biz, y)
                                * weights.at(ni, slot, biz, f, y);
                        }
                    }
                }
            }
            let d = weights.at(ni, slot, biz, typ_biz, y);
            out.set(ni, slot, biz, typ_biz, y, num / d.powi(weight_power(u, 4)));
        }

        if space.touches_ooh_assets(group) {
            for y in 0..years {
                let blended = (out.at(ni, slot, biz, typ_biz, y)
                    * weights.at(ni, slot, biz, typ_biz, y)
                    + out.at(ooh, slot, ooh_form, typ_biz_ooh, y)
                        * weights.at(ooh, slot, ooh_form, typ_biz_ooh, y))
                    / weights.at(ni, slot, biz_ooh, typ_biz_ooh, y);
                out.set(ni, slot, biz_ooh, typ_biz_ooh, y, blended);
            }
        } else {
            for y in 0..years {
                let repeated = out.at(ni, slot, biz, typ_biz, y);
                out.set(ni, slot, biz_ooh, typ_biz_ooh, y, repeated);
            }
        }
    }

    out.freeze()
}
