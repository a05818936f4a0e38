use crate::cube::Shape;
use crate::space::types::{FinancingSource, LegalForm};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::ops::Range;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpaceError {
    #[error("at least two industries are required (owner-occupied housing plus one business industry)")]
    TooFewIndustries,
    #[error("at least one simulated year is required")]
    NoYears,
    #[error("asset group '{group}' references asset index {index} outside 0..{assets}")]
    GroupMemberOutOfRange {
        group: String,
        index: usize,
        assets: usize,
    },
    #[error("asset group '{0}' has no members")]
    EmptyGroup(String),
    #[error("no asset groups defined")]
    NoGroups,
    #[error("asset marker index {index} outside 0..{assets}")]
    MarkerOutOfRange { index: usize, assets: usize },
    #[error("reference group index {0} does not name a defined asset group")]
    BadReferenceGroup(usize),
}

/// A named roll-up group along the asset axis.
///
/// Members are disaggregated asset indices; the group's computed value lives
/// in its reserved aggregate slot appended after the disaggregated assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetGroup {
    pub name: String,
    pub members: SmallVec<[u16; 32]>,
}

impl AssetGroup {
    pub fn new(name: &str, members: impl IntoIterator<Item = usize>) -> Self {
        Self {
            name: name.to_string(),
            members: members.into_iter().map(|m| m as u16).collect(),
        }
    }

    pub fn contains(&self, asset: usize) -> bool {
        self.members.iter().any(|&m| m as usize == asset)
    }

    pub fn member_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.members.iter().map(|&m| m as usize)
    }
}

/// How an asset group relates to the two owner-occupied-housing asset types.
///
/// Drives the fallback ladder for the OOH industry row in asset-group
/// roll-ups: the OOH housing stock consists of residential buildings and
/// land only, so a group covering neither has no OOH value at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OohCoverage {
    /// Group contains both residential buildings and land.
    Pair,
    /// Group contains residential buildings but not land.
    ResidentialOnly,
    /// Group contains neither.
    None,
}

/// Immutable description of the aggregation space.
///
/// Constructed once per run and passed by reference to the engine. The
/// industry axis carries the disaggregated industries (owner-occupied
/// housing last) plus one trailing all-industries slot; the asset axis
/// carries the disaggregated asset types plus one trailing slot per group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceRegistry {
    industries: usize,
    assets: usize,
    years: usize,
    groups: Vec<AssetGroup>,
    residential_buildings: usize,
    land: usize,
    reference_group: usize,
}

impl SpaceRegistry {
    pub fn new(
        industries: usize,
        assets: usize,
        years: usize,
        groups: Vec<AssetGroup>,
        residential_buildings: usize,
        land: usize,
        reference_group: usize,
    ) -> Result<Self, SpaceError> {
        if industries < 2 {
            return Err(SpaceError::TooFewIndustries);
        }
        if years == 0 {
            return Err(SpaceError::NoYears);
        }
        if groups.is_empty() {
            return Err(SpaceError::NoGroups);
        }
        for group in &groups {
            if group.members.is_empty() {
                return Err(SpaceError::EmptyGroup(group.name.clone()));
            }
            if let Some(bad) = group.member_indices().find(|&m| m >= assets) {
                return Err(SpaceError::GroupMemberOutOfRange {
                    group: group.name.clone(),
                    index: bad,
                    assets,
                });
            }
        }
        for marker in [residential_buildings, land] {
            if marker >= assets {
                return Err(SpaceError::MarkerOutOfRange {
                    index: marker,
                    assets,
                });
            }
        }
        if reference_group >= groups.len() {
            return Err(SpaceError::BadReferenceGroup(reference_group));
        }
        Ok(Self {
            industries,
            assets,
            years,
            groups,
            residential_buildings,
            land,
            reference_group,
        })
    }

    /// The standard space of the capital-taxation model: the original
    /// asset-class layout (32 equipment, 23 structures, 19 IPP, 2 non-BEA
    /// intangibles, 2 residential, 1 inventories, 1 land, 3 non-BEA natural
    /// resources) and its nine aggregate groups, parameterized by industry
    /// and year counts.
    pub fn standard(industries: usize, years: usize) -> Result<Self, SpaceError> {
        let layout = StandardAssetLayout::default();
        Self::new(
            industries,
            layout.num_assets(),
            years,
            layout.groups(),
            layout.residential_structures(),
            layout.land_index(),
            StandardAssetLayout::REFERENCE_GROUP,
        )
    }

    pub fn industries(&self) -> usize {
        self.industries
    }

    pub fn assets(&self) -> usize {
        self.assets
    }

    pub fn years(&self) -> usize {
        self.years
    }

    pub fn groups(&self) -> &[AssetGroup] {
        &self.groups
    }

    /// Owner-occupied housing is always the last disaggregated industry.
    #[inline(always)]
    pub fn ooh_industry(&self) -> usize {
        self.industries - 1
    }

    pub fn business_industries(&self) -> Range<usize> {
        0..self.industries - 1
    }

    pub fn all_industries(&self) -> Range<usize> {
        0..self.industries
    }

    /// Index of the all-industries aggregate slot.
    #[inline(always)]
    pub fn all_industries_slot(&self) -> usize {
        self.industries
    }

    /// Aggregate slot for the given group index.
    #[inline(always)]
    pub fn group_slot(&self, group: usize) -> usize {
        self.assets + group
    }

    /// Aggregate slot of the reference group that anchors uniformity
    /// weighting (all equipment, structures, IPP, inventories, and land).
    #[inline(always)]
    pub fn reference_slot(&self) -> usize {
        self.group_slot(self.reference_group)
    }

    /// The two asset types making up the owner-occupied housing stock,
    /// in axis order: residential buildings, then land.
    pub fn ooh_assets(&self) -> [usize; 2] {
        [self.residential_buildings, self.land]
    }

    pub fn residential_buildings(&self) -> usize {
        self.residential_buildings
    }

    pub fn ooh_coverage(&self, group: &AssetGroup) -> OohCoverage {
        let residential = group.contains(self.residential_buildings);
        let land = group.contains(self.land);
        match (residential, land) {
            (true, true) => OohCoverage::Pair,
            (true, false) => OohCoverage::ResidentialOnly,
            _ => OohCoverage::None,
        }
    }

    /// Whether the group touches either OOH asset type; gates the
    /// businesses-plus-OOH blend of industry-collapsed group cells.
    pub fn touches_ooh_assets(&self, group: &AssetGroup) -> bool {
        group.contains(self.residential_buildings) || group.contains(self.land)
    }

    /// Full padded output shape.
    pub fn shape(&self) -> Shape {
        Shape {
            industries: self.industries + 1,
            assets: self.assets + self.groups.len(),
            legal_forms: LegalForm::COUNT,
            financing_sources: FinancingSource::COUNT,
            years: self.years,
        }
    }
}

/// Asset-class extents of the standard model, in axis order.
#[derive(Debug, Clone)]
pub struct StandardAssetLayout {
    pub equipment: usize,
    pub structures: usize,
    pub ipp: usize,
    pub non_bea_intangibles: usize,
    pub residential: usize,
    pub inventories: usize,
    pub land: usize,
    pub non_bea_natural_resources: usize,
}

impl Default for StandardAssetLayout {
    fn default() -> Self {
        Self {
            equipment: 32,
            structures: 23,
            ipp: 19,
            non_bea_intangibles: 2,
            residential: 2,
            inventories: 1,
            land: 1,
            non_bea_natural_resources: 3,
        }
    }
}

impl StandardAssetLayout {
    /// Position of the reference group in `groups()`.
    pub const REFERENCE_GROUP: usize = 6;

    // Mineral exploration leads the IPP block, followed by purchased
    // software, then research and development, then entertainment originals.
    const MINERAL: usize = 8;
    const SOFTWARE: usize = 2;
    const RESEARCH: usize = 4;

    pub fn num_assets(&self) -> usize {
        self.equipment
            + self.structures
            + self.ipp
            + self.non_bea_intangibles
            + self.residential
            + self.inventories
            + self.land
            + self.non_bea_natural_resources
    }

    fn nonres_equipment(&self) -> Range<usize> {
        0..self.equipment
    }

    fn nonres_structures(&self) -> Range<usize> {
        self.equipment..self.equipment + self.structures
    }

    fn ipp_block(&self) -> Range<usize> {
        let start = self.nonres_structures().end;
        start..start + self.ipp + self.non_bea_intangibles
    }

    fn mineral(&self) -> Range<usize> {
        let start = self.ipp_block().start;
        start..start + Self::MINERAL
    }

    fn research(&self) -> Range<usize> {
        let start = self.mineral().end + Self::SOFTWARE;
        start..start + Self::RESEARCH
    }

    fn residential_block(&self) -> Range<usize> {
        let start = self.ipp_block().end;
        start..start + self.residential
    }

    /// Residential structures, the asset type the OOH fallback keys on.
    pub fn residential_structures(&self) -> usize {
        self.residential_block().end - 1
    }

    fn inventories_block(&self) -> Range<usize> {
        let start = self.residential_block().end;
        start..start + self.inventories
    }

    /// Land, the other asset type the OOH fallback keys on.
    pub fn land_index(&self) -> usize {
        self.inventories_block().end
    }

    fn land_block(&self) -> Range<usize> {
        let start = self.land_index();
        start..start + self.land + self.non_bea_natural_resources
    }

    /// The nine standard aggregate groups, in slot order.
    pub fn groups(&self) -> Vec<AssetGroup> {
        let other_ipp: Vec<usize> = self
            .ipp_block()
            .filter(|a| !self.mineral().contains(a) && !self.research().contains(a))
            .collect();
        let equip_struct_invent: Vec<usize> = self
            .nonres_equipment()
            .chain(self.nonres_structures())
            .chain(self.mineral())
            .chain(self.residential_block())
            .chain(self.inventories_block())
            .collect();
        let equip_struct_invent_land: Vec<usize> = equip_struct_invent
            .iter()
            .copied()
            .chain(self.land_block())
            .collect();

        let mut groups = vec![
            AssetGroup::new("Nonresidential equipment", self.nonres_equipment()),
            AssetGroup::new(
                "Nonresidential structures",
                self.nonres_structures().chain(self.mineral()),
            ),
            AssetGroup::new("Residential capital", self.residential_block()),
            AssetGroup::new("Research and development", self.research()),
            AssetGroup::new("Other intellectual property", other_ipp),
            AssetGroup::new(
                "Equipment, structures, IPP, and inventories",
                0..self.inventories_block().end,
            ),
            AssetGroup::new(
                "All equipment, structures, IPP, inventories, and land",
                0..self.num_assets(),
            ),
            AssetGroup::new("Equipment, structures, and inventories", equip_struct_invent),
            AssetGroup::new(
                "Equipment, structures, inventories, and land",
                equip_struct_invent_land,
            ),
        ];
        // Slot order matters; member order within a group does not, but keep
        // it ascending for reproducible serialization.
        for group in &mut groups {
            group.members.sort_unstable();
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_groups() -> Vec<AssetGroup> {
        vec![
            AssetGroup::new("equipment", [0]),
            AssetGroup::new("all", [0, 1, 2, 3]),
        ]
    }

    #[test]
    fn test_standard_space_extents() {
        let space = SpaceRegistry::standard(3, 2).unwrap();
        assert_eq!(space.assets(), 83);
        assert_eq!(space.groups().len(), 9);
        assert_eq!(space.all_industries_slot(), 3);
        assert_eq!(space.ooh_industry(), 2);
        let shape = space.shape();
        assert_eq!(shape.industries, 4);
        assert_eq!(shape.assets, 92);
        assert_eq!(shape.legal_forms, 6);
        assert_eq!(shape.financing_sources, 6);
    }

    #[test]
    fn test_standard_reference_group_covers_everything() {
        let space = SpaceRegistry::standard(3, 1).unwrap();
        let reference = &space.groups()[StandardAssetLayout::REFERENCE_GROUP];
        assert_eq!(reference.members.len(), space.assets());
        assert_eq!(space.reference_slot(), space.assets() + 6);
        assert_eq!(space.ooh_coverage(reference), OohCoverage::Pair);
    }

    #[test]
    fn test_standard_group_contents() {
        let layout = StandardAssetLayout::default();
        let groups = layout.groups();
        // Nonresidential equipment stops short of the residential block.
        assert_eq!(groups[0].members.len(), 32);
        assert!(!groups[0].contains(layout.residential_structures()));
        // Structures pick up mineral exploration under the NIPA convention.
        assert_eq!(groups[1].members.len(), 23 + 8);
        // Residential carries both residential asset types.
        assert_eq!(
            groups[2].member_indices().collect::<Vec<_>>(),
            vec![76, 77]
        );
        assert_eq!(layout.land_index(), 79);
        // Equipment + structures + inventories: everything below the IPP
        // remainder plus the residential pair and inventories.
        assert_eq!(groups[7].members.len(), 32 + 23 + 8 + 2 + 1);
        assert_eq!(groups[8].members.len(), groups[7].members.len() + 4);
    }

    #[test]
    fn test_ooh_coverage_ladder() {
        let space = SpaceRegistry::new(
            3,
            4,
            1,
            vec![
                AssetGroup::new("neither", [0]),
                AssetGroup::new("residential only", [0, 1]),
                AssetGroup::new("pair", [1, 3]),
            ],
            1,
            3,
            2,
        )
        .unwrap();
        assert_eq!(space.ooh_coverage(&space.groups()[0]), OohCoverage::None);
        assert_eq!(
            space.ooh_coverage(&space.groups()[1]),
            OohCoverage::ResidentialOnly
        );
        assert_eq!(space.ooh_coverage(&space.groups()[2]), OohCoverage::Pair);
        assert!(!space.touches_ooh_assets(&space.groups()[0]));
        assert!(space.touches_ooh_assets(&space.groups()[1]));
    }

    #[test]
    fn test_rejects_bad_configuration() {
        assert_eq!(
            SpaceRegistry::new(1, 4, 1, small_groups(), 1, 3, 0),
            Err(SpaceError::TooFewIndustries)
        );
        assert_eq!(
            SpaceRegistry::new(3, 4, 0, small_groups(), 1, 3, 0),
            Err(SpaceError::NoYears)
        );
        assert!(matches!(
            SpaceRegistry::new(
                3,
                4,
                1,
                vec![AssetGroup::new("bad", [7])],
                1,
                3,
                0
            ),
            Err(SpaceError::GroupMemberOutOfRange { index: 7, .. })
        ));
        assert_eq!(
            SpaceRegistry::new(3, 4, 1, small_groups(), 1, 3, 5),
            Err(SpaceError::BadReferenceGroup(5))
        );
        assert_eq!(
            SpaceRegistry::new(3, 4, 1, vec![], 1, 3, 0),
            Err(SpaceError::NoGroups)
        );
    }
}
