//! Column schema for the dress-code worksheet
//!
//! Header and row are both generated from [`COLUMNS`], so positional
//! alignment holds for every record. Changing the schema means editing this
//! table and nothing else.

/// How a column's value is read from the analysis tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Single value at the path; non-strings are rendered as text
    Scalar,

    /// List of strings at the path, joined with `", "`
    JoinedList,
}

/// One worksheet column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Header text
    pub name: &'static str,

    /// Dotted path into the analysis tree
    pub path: &'static str,

    /// Lookup kind
    pub kind: ColumnKind,
}

impl Column {
    const fn new(name: &'static str, path: &'static str, kind: ColumnKind) -> Self {
        Self { name, path, kind }
    }

    /// Path segments
    pub fn segments(&self) -> impl Iterator<Item = &'static str> {
        self.path.split('.')
    }
}

/// Separator for [`ColumnKind::JoinedList`] columns
pub const LIST_SEPARATOR: &str = ", ";

/// Ordered worksheet columns
#[rustfmt::skip]
pub static COLUMNS: &[Column] = &[
    // general
    Column::new("見直しプロセス_規定", "general.revision_process.status", ColumnKind::Scalar),
    Column::new("見直しプロセス_根拠", "general.revision_process.evidence", ColumnKind::Scalar),

    // uniform
    Column::new("標準服_指定", "uniform.standard_uniform.status", ColumnKind::Scalar),
    Column::new("標準服_根拠", "uniform.standard_uniform.evidence", ColumnKind::Scalar),
    Column::new("LGBTQへの配慮", "uniform.lgbtq_consideration.status", ColumnKind::Scalar),
    Column::new("LGBTQへの配慮_根拠", "uniform.lgbtq_consideration.evidence", ColumnKind::Scalar),
    Column::new("衣替え移行期間", "uniform.seasonal_transition_period.status", ColumnKind::Scalar),
    Column::new("衣替え移行期間_根拠", "uniform.seasonal_transition_period.evidence", ColumnKind::Scalar),

    // clothing items
    Column::new("シャツ・ブラウス_色指定", "clothing_items.shirts_blouses.color_specification.status", ColumnKind::Scalar),
    Column::new("シャツ・ブラウス_色指定_根拠", "clothing_items.shirts_blouses.color_specification.evidence", ColumnKind::Scalar),
    Column::new("シャツ・ブラウス_着用方法_指定", "clothing_items.shirts_blouses.wearing_method.status", ColumnKind::Scalar),
    Column::new("シャツ・ブラウス_着用方法_詳細", "clothing_items.shirts_blouses.wearing_method.details", ColumnKind::Scalar),
    Column::new("シャツ・ブラウス_着用方法_根拠", "clothing_items.shirts_blouses.wearing_method.evidence", ColumnKind::Scalar),
    Column::new("下着_着用義務", "clothing_items.underwear.obligation_to_wear.status", ColumnKind::Scalar),
    Column::new("下着_着用義務_根拠", "clothing_items.underwear.obligation_to_wear.evidence", ColumnKind::Scalar),
    Column::new("下着_色指定", "clothing_items.underwear.color_specification.status", ColumnKind::Scalar),
    Column::new("下着_色指定_根拠", "clothing_items.underwear.color_specification.evidence", ColumnKind::Scalar),
    Column::new("下着_柄指定", "clothing_items.underwear.pattern_specification.status", ColumnKind::Scalar),
    Column::new("下着_柄指定_根拠", "clothing_items.underwear.pattern_specification.evidence", ColumnKind::Scalar),
    Column::new("スラックス・スカート_丈の指定", "clothing_items.slacks_skirts.length_specification.status", ColumnKind::Scalar),
    Column::new("スラックス・スカート_丈の指定_根拠", "clothing_items.slacks_skirts.length_specification.evidence", ColumnKind::Scalar),
    Column::new("ベルト_着用義務", "clothing_items.slacks_skirts.belt_obligation.status", ColumnKind::Scalar),
    Column::new("ベルト_着用義務_根拠", "clothing_items.slacks_skirts.belt_obligation.evidence", ColumnKind::Scalar),
    Column::new("ベルト_色指定", "clothing_items.slacks_skirts.belt_color_specification.status", ColumnKind::Scalar),
    Column::new("ベルト_色指定_根拠", "clothing_items.slacks_skirts.belt_color_specification.evidence", ColumnKind::Scalar),
    Column::new("ベルト_デザイン指定", "clothing_items.slacks_skirts.belt_design_specification.status", ColumnKind::Scalar),
    Column::new("ベルト_デザイン指定_根拠", "clothing_items.slacks_skirts.belt_design_specification.evidence", ColumnKind::Scalar),
    Column::new("防寒着(屋内)_色指定", "clothing_items.indoor_outerwear.color_specification.status", ColumnKind::Scalar),
    Column::new("防寒着(屋内)_色指定_根拠", "clothing_items.indoor_outerwear.color_specification.evidence", ColumnKind::Scalar),
    Column::new("防寒着(屋内)_種類制限", "clothing_items.indoor_outerwear.type_restriction.status", ColumnKind::Scalar),
    Column::new("防寒着(屋内)_種類制限_根拠", "clothing_items.indoor_outerwear.type_restriction.evidence", ColumnKind::Scalar),
    Column::new("防寒着(屋内)_柄指定", "clothing_items.indoor_outerwear.pattern_specification.status", ColumnKind::Scalar),
    Column::new("防寒着(屋内)_柄指定_根拠", "clothing_items.indoor_outerwear.pattern_specification.evidence", ColumnKind::Scalar),
    Column::new("防寒着(屋外)_学校指定", "clothing_items.outdoor_outerwear.school_designated.status", ColumnKind::Scalar),
    Column::new("防寒着(屋外)_学校指定_根拠", "clothing_items.outdoor_outerwear.school_designated.evidence", ColumnKind::Scalar),
    Column::new("防寒着(屋外)_色指定", "clothing_items.outdoor_outerwear.color_specification.status", ColumnKind::Scalar),
    Column::new("防寒着(屋外)_色指定_根拠", "clothing_items.outdoor_outerwear.color_specification.evidence", ColumnKind::Scalar),
    Column::new("防寒着(屋外)_デザイン指定", "clothing_items.outdoor_outerwear.design_specification.status", ColumnKind::Scalar),
    Column::new("防寒着(屋外)_デザイン指定_根拠", "clothing_items.outdoor_outerwear.design_specification.evidence", ColumnKind::Scalar),
    Column::new("マフラー・手袋_着用", "clothing_items.scarves_gloves.status", ColumnKind::Scalar),
    Column::new("マフラー・手袋_着用_根拠", "clothing_items.scarves_gloves.evidence", ColumnKind::Scalar),
    Column::new("靴下_デザイン指定", "clothing_items.socks.design_specification.status", ColumnKind::Scalar),
    Column::new("靴下_デザイン指定_根拠", "clothing_items.socks.design_specification.evidence", ColumnKind::Scalar),
    Column::new("靴下_長さ指定", "clothing_items.socks.length_specification.status", ColumnKind::Scalar),
    Column::new("靴下_長さ指定_根拠", "clothing_items.socks.length_specification.evidence", ColumnKind::Scalar),

    // appearance
    Column::new("頭髪_男女別の長さ指定", "appearance.hair.gender_specific_length.status", ColumnKind::Scalar),
    Column::new("頭髪_男女別の長さ指定_根拠", "appearance.hair.gender_specific_length.evidence", ColumnKind::Scalar),
    Column::new("頭髪_前髪・襟足の長さ指定", "appearance.hair.fringe_neck_length.status", ColumnKind::Scalar),
    Column::new("頭髪_前髪・襟足の長さ指定_根拠", "appearance.hair.fringe_neck_length.evidence", ColumnKind::Scalar),
    Column::new("頭髪_結束義務", "appearance.hair.tying_obligation.status", ColumnKind::Scalar),
    Column::new("頭髪_結束義務_根拠", "appearance.hair.tying_obligation.evidence", ColumnKind::Scalar),
    Column::new("頭髪_禁止の髪型・加工", "appearance.hair.prohibited_styles_modifications.status", ColumnKind::Scalar),
    Column::new("頭髪_禁止の髪型・加工_項目", "appearance.hair.prohibited_styles_modifications.items", ColumnKind::JoinedList),
    Column::new("頭髪_禁止の髪型・加工_根拠", "appearance.hair.prohibited_styles_modifications.evidence", ColumnKind::Scalar),
    Column::new("頭髪_抽象的な表現での指定", "appearance.hair.abstract_expressions.status", ColumnKind::Scalar),
    Column::new("頭髪_抽象的な表現での指定_根拠", "appearance.hair.abstract_expressions.evidence", ColumnKind::Scalar),
    Column::new("髪飾り_指定", "appearance.hair.hair_accessories.status", ColumnKind::Scalar),
    Column::new("髪飾り_指定_詳細", "appearance.hair.hair_accessories.details", ColumnKind::Scalar),
    Column::new("髪飾り_指定_根拠", "appearance.hair.hair_accessories.evidence", ColumnKind::Scalar),
    Column::new("化粧禁止", "appearance.face.makeup_prohibition.status", ColumnKind::Scalar),
    Column::new("化粧禁止_根拠", "appearance.face.makeup_prohibition.evidence", ColumnKind::Scalar),
    Column::new("眉毛加工の禁止", "appearance.face.eyebrow_modification_prohibition.status", ColumnKind::Scalar),
    Column::new("眉毛加工の禁止_根拠", "appearance.face.eyebrow_modification_prohibition.evidence", ColumnKind::Scalar),
    Column::new("頭髪検査", "appearance.inspections.hair_inspection.status", ColumnKind::Scalar),
    Column::new("頭髪検査_根拠", "appearance.inspections.hair_inspection.evidence", ColumnKind::Scalar),

    // belongings
    Column::new("通学カバン_学校指定", "belongings.school_bag.school_designated.status", ColumnKind::Scalar),
    Column::new("通学カバン_学校指定_根拠", "belongings.school_bag.school_designated.evidence", ColumnKind::Scalar),
    Column::new("通学カバン_デザイン指定", "belongings.school_bag.design_specification.status", ColumnKind::Scalar),
    Column::new("通学カバン_デザイン指定_根拠", "belongings.school_bag.design_specification.evidence", ColumnKind::Scalar),
    Column::new("通学カバン_アクセサリー制限", "belongings.school_bag.accessory_restriction.status", ColumnKind::Scalar),
    Column::new("通学カバン_アクセサリー制限_根拠", "belongings.school_bag.accessory_restriction.evidence", ColumnKind::Scalar),
    Column::new("ケア用品_持ち込み", "belongings.care_products.carrying_prohibited.status", ColumnKind::Scalar),
    Column::new("ケア用品_持ち込み_根拠", "belongings.care_products.carrying_prohibited.evidence", ColumnKind::Scalar),
    Column::new("特定用品の持ち込み制限", "belongings.care_products.specific_item_restriction.status", ColumnKind::Scalar),
    Column::new("特定用品の持ち込み制限_根拠", "belongings.care_products.specific_item_restriction.evidence", ColumnKind::Scalar),

    // school life outside
    Column::new("寄り道禁止", "school_life_outside.loitering_prohibition.status", ColumnKind::Scalar),
    Column::new("寄り道禁止_根拠", "school_life_outside.loitering_prohibition.evidence", ColumnKind::Scalar),
    Column::new("特定施設への立ち入り禁止", "school_life_outside.facility_entry_prohibition.status", ColumnKind::Scalar),
    Column::new("特定施設への立ち入り禁止_詳細", "school_life_outside.facility_entry_prohibition.details", ColumnKind::Scalar),
    Column::new("特定施設への立ち入り禁止_根拠", "school_life_outside.facility_entry_prohibition.evidence", ColumnKind::Scalar),
    Column::new("公共の場での集まり禁止", "school_life_outside.gathering_in_public_prohibition.status", ColumnKind::Scalar),
    Column::new("公共の場での集まり禁止_根拠", "school_life_outside.gathering_in_public_prohibition.evidence", ColumnKind::Scalar),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_column_count() {
        assert_eq!(COLUMNS.len(), 82);
    }

    #[test]
    fn test_names_and_paths_unique() {
        let names: HashSet<_> = COLUMNS.iter().map(|c| c.name).collect();
        let paths: HashSet<_> = COLUMNS.iter().map(|c| c.path).collect();
        assert_eq!(names.len(), COLUMNS.len());
        assert_eq!(paths.len(), COLUMNS.len());
    }

    #[test]
    fn test_single_joined_column() {
        let joined: Vec<_> = COLUMNS
            .iter()
            .filter(|c| c.kind == ColumnKind::JoinedList)
            .collect();
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].name, "頭髪_禁止の髪型・加工_項目");
    }

    #[test]
    fn test_top_level_sections() {
        let sections: HashSet<_> = COLUMNS
            .iter()
            .filter_map(|c| c.segments().next())
            .collect();
        let expected: HashSet<_> = [
            "general",
            "uniform",
            "clothing_items",
            "appearance",
            "belongings",
            "school_life_outside",
        ]
        .into_iter()
        .collect();
        assert_eq!(sections, expected);
    }
}
