use core_types::Lang;

/// Headings and figure names printed by the CLI tables.
#[derive(Debug)]
pub struct Labels {
    pub min_required: &'static str,
    pub net_after_conversion: &'static str,
    pub target_with_notary: &'static str,
    pub profit: &'static str,
    pub figure: &'static str,
    pub cover_pct: &'static str,
    pub profit_pct: &'static str,
    pub section_verify: &'static str,
    pub section_costs: &'static str,
    pub section_market: &'static str,
    pub quartile_title: &'static str,
    pub outliers_removed: &'static str,
    pub source: &'static str,
    pub all_platforms: &'static str,
    pub listings: &'static str,
    pub min_per_sqm: &'static str,
    pub avg_per_sqm: &'static str,
    pub median_per_sqm: &'static str,
    pub max_per_sqm: &'static str,
    pub dominant_range: &'static str,
}

const EN: Labels = Labels {
    min_required: "Minimum required price",
    net_after_conversion: "Net after conversion",
    target_with_notary: "Target (with notary)",
    profit: "Profit",
    figure: "Figure",
    cover_pct: "Cover %",
    profit_pct: "Profit %",
    section_verify: "Verification",
    section_costs: "Costs & Taxes",
    section_market: "Market analysis",
    quartile_title: "Quartile Analysis",
    outliers_removed: "Outliers removed",
    source: "Source",
    all_platforms: "All platforms",
    listings: "Number of listings",
    min_per_sqm: "Min price / m²",
    avg_per_sqm: "Average price / m²",
    median_per_sqm: "Median price / m²",
    max_per_sqm: "Max price / m²",
    dominant_range: "Dominant range",
};

const RO: Labels = Labels {
    min_required: "Preț minim necesar",
    net_after_conversion: "Net după conversie",
    target_with_notary: "Țintă (cu notar)",
    profit: "Profit",
    figure: "Indicator",
    cover_pct: "Acoperire %",
    profit_pct: "Profit %",
    section_verify: "Verificare",
    section_costs: "Costuri & taxe",
    section_market: "Analiză piață",
    quartile_title: "Analiză Quartilă",
    outliers_removed: "Valori extreme eliminate",
    source: "Sursă",
    all_platforms: "Toate platformele",
    listings: "Număr anunțuri",
    min_per_sqm: "Preț minim / m²",
    avg_per_sqm: "Preț mediu / m²",
    median_per_sqm: "Mediană / m²",
    max_per_sqm: "Preț maxim / m²",
    dominant_range: "Interval dominant",
};

pub fn labels(lang: Lang) -> &'static Labels {
    match lang {
        Lang::En => &EN,
        Lang::Ro => &RO,
    }
}
