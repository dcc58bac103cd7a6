//! Static DSE sector classification.
//!
//! Context only: the sector name and note are attached to the
//! predictability notes but never change a score.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sector {
    Pharmaceuticals,
    Banking,
    /// Non-bank financial institutions
    Nbfi,
    Cement,
    Fmcg,
    TextilesRmg,
    PowerEnergy,
    Telecom,
    It,
    Ceramics,
    Steel,
    FoodAllied,
    Insurance,
    Engineering,
    Miscellaneous,
    Unknown,
}

impl Sector {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sector::Pharmaceuticals => "Pharmaceuticals",
            Sector::Banking => "Banking",
            Sector::Nbfi => "NBFI",
            Sector::Cement => "Cement",
            Sector::Fmcg => "FMCG",
            Sector::TextilesRmg => "Textiles & RMG",
            Sector::PowerEnergy => "Power & Energy",
            Sector::Telecom => "Telecom",
            Sector::It => "IT & Technology",
            Sector::Ceramics => "Ceramics",
            Sector::Steel => "Steel",
            Sector::FoodAllied => "Food & Allied",
            Sector::Insurance => "Insurance",
            Sector::Engineering => "Engineering",
            Sector::Miscellaneous => "Miscellaneous",
            Sector::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Sector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    Low,
    Medium,
    High,
    Varies,
    Unknown,
}

/// Investment context for a sector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SectorProfile {
    pub sector: Sector,
    pub display_name: &'static str,
    pub cyclicality: Level,
    pub defensive: bool,
    pub growth_potential: Level,
    /// Effect of a weaker taka on the sector
    pub currency_impact: &'static str,
    pub verdict: &'static str,
    pub investment_note: &'static str,
    pub main_risk: &'static str,
}

#[allow(clippy::too_many_arguments)]
const fn profile_of(
    sector: Sector,
    display_name: &'static str,
    cyclicality: Level,
    defensive: bool,
    growth_potential: Level,
    currency_impact: &'static str,
    verdict: &'static str,
    investment_note: &'static str,
    main_risk: &'static str,
) -> SectorProfile {
    SectorProfile {
        sector,
        display_name,
        cyclicality,
        defensive,
        growth_potential,
        currency_impact,
        verdict,
        investment_note,
        main_risk,
    }
}

static PROFILES: [SectorProfile; 16] = [
    profile_of(
        Sector::Pharmaceuticals,
        "Pharmaceuticals",
        Level::Low,
        true,
        Level::High,
        "Neutral",
        "Defensive + Growth",
        "One of Bangladesh's strongest sectors. Look for companies with FDA/WHO approvals and export revenue growth.",
        "API raw material imports from China/India",
    ),
    profile_of(
        Sector::Banking,
        "Banking",
        Level::High,
        false,
        Level::Medium,
        "Negative",
        "High Risk/Reward",
        "Cherry-pick quality private banks only. Avoid state banks and those with governance issues. Check NPL ratios carefully.",
        "Connected lending and governance issues",
    ),
    profile_of(
        Sector::Nbfi,
        "Non-Bank Financial Institutions",
        Level::High,
        false,
        Level::Low,
        "Negative",
        "Avoid/Speculative",
        "Structural problems persist. Only consider IDLC or Lanka Bangla if governance is priority. Most NBFIs are uninvestable.",
        "Structural funding mismatch",
    ),
    profile_of(
        Sector::Cement,
        "Cement",
        Level::High,
        false,
        Level::High,
        "Negative",
        "Cyclical",
        "Tied to infrastructure spending cycle. Cost pressures from imports. Prefer companies with captive power and efficient logistics.",
        "USD-denominated clinker imports",
    ),
    profile_of(
        Sector::Fmcg,
        "Fast Moving Consumer Goods",
        Level::Low,
        true,
        Level::Medium,
        "Slight Negative",
        "Defensive Compounder",
        "Steady growth, inflation hedge. Look for companies with strong distribution and pricing power. MARICO, Olympic are quality names.",
        "Raw material import exposure",
    ),
    profile_of(
        Sector::TextilesRmg,
        "Textiles & RMG",
        Level::High,
        false,
        Level::Medium,
        "Positive",
        "Export Play",
        "Benefits from weak BDT. Look for vertically integrated players with compliance certifications. Margin pressure is ongoing concern.",
        "Order diversification away from Bangladesh",
    ),
    profile_of(
        Sector::PowerEnergy,
        "Power & Energy",
        Level::Low,
        true,
        Level::Low,
        "Negative",
        "Utility/Defensive",
        "Predictable but limited growth. UPGDCL is unique monopoly play. IPPs face payment risk. Good for income-focused investors.",
        "Government payment delays",
    ),
    profile_of(
        Sector::Telecom,
        "Telecom",
        Level::Low,
        true,
        Level::Low,
        "Neutral",
        "Cash Cow",
        "Limited growth but strong cash generation. GP is the only listed quality option. Regulatory risks are main concern.",
        "Regulatory uncertainty (license renewals, taxes)",
    ),
    profile_of(
        Sector::It,
        "IT & Technology",
        Level::Medium,
        false,
        Level::High,
        "Positive",
        "Emerging",
        "High potential but limited DSE options. Most value creation happening in unlisted startups. Watch for new listings.",
        "Limited investable listed companies",
    ),
    profile_of(
        Sector::Ceramics,
        "Ceramics & Tiles",
        Level::High,
        false,
        Level::Medium,
        "Negative",
        "Cyclical/Real Estate Proxy",
        "Tied to construction and real estate cycle. Gas availability is key operational risk. FU-WANG, RAK are established players.",
        "Gas supply disruptions",
    ),
    profile_of(
        Sector::Steel,
        "Steel",
        Level::High,
        false,
        Level::Medium,
        "Highly Negative",
        "Avoid in Weak BDT",
        "Structurally challenged when BDT is weak. Margin compression is ongoing. Only consider in stable currency environment.",
        "Severe currency exposure",
    ),
    profile_of(
        Sector::FoodAllied,
        "Food & Allied",
        Level::Low,
        true,
        Level::Medium,
        "Slight Negative",
        "Defensive",
        "Inflation hedge with steady demand. Olympic (biscuits), AMCL Pran are established. Look for pricing power and brand strength.",
        "Input cost inflation",
    ),
    profile_of(
        Sector::Insurance,
        "Insurance",
        Level::Medium,
        false,
        Level::High,
        "Neutral",
        "Growth Potential",
        "Long runway but quality screening essential. Avoid companies with governance red flags. Delta Life, Green Delta relatively better.",
        "Claims dispute reputation",
    ),
    profile_of(
        Sector::Engineering,
        "Engineering",
        Level::High,
        false,
        Level::Medium,
        "Negative",
        "Selective",
        "Pick companies with clear competitive advantages and less import dependency. Singer, Walton (unlisted) are market leaders.",
        "Project-based revenue volatility",
    ),
    profile_of(
        Sector::Miscellaneous,
        "Miscellaneous",
        Level::Varies,
        false,
        Level::Varies,
        "Varies",
        "Case by Case",
        "Analyze each company individually. No sector-level thesis applies.",
        "Sector-specific risks vary",
    ),
    profile_of(
        Sector::Unknown,
        "Unclassified",
        Level::Unknown,
        false,
        Level::Unknown,
        "Unknown",
        "Needs Classification",
        "This stock needs sector classification for proper analysis.",
        "Unknown sector risks",
    ),
];

const SYMBOLS: &[(&str, Sector)] = &[
    // Pharmaceuticals
    ("ACI", Sector::Pharmaceuticals),
    ("ACIFORMULA", Sector::Pharmaceuticals),
    ("ACMELAB", Sector::Pharmaceuticals),
    ("ACMEPL", Sector::Pharmaceuticals),
    ("ACTIVEFINE", Sector::Pharmaceuticals),
    ("ADVENT", Sector::Pharmaceuticals),
    ("AFCAGRO", Sector::Pharmaceuticals),
    ("AMBEEPHA", Sector::Pharmaceuticals),
    ("ASIATICLAB", Sector::Pharmaceuticals),
    ("BEACONPHAR", Sector::Pharmaceuticals),
    ("BXPHARMA", Sector::Pharmaceuticals),
    ("CENTRALPHL", Sector::Pharmaceuticals),
    ("FARCHEM", Sector::Pharmaceuticals),
    ("GHCL", Sector::Pharmaceuticals),
    ("IBNSINA", Sector::Pharmaceuticals),
    ("IBP", Sector::Pharmaceuticals),
    ("JHRML", Sector::Pharmaceuticals),
    ("JMISMDL", Sector::Pharmaceuticals),
    ("KEYACOSMET", Sector::Pharmaceuticals),
    ("KOHINOOR", Sector::Pharmaceuticals),
    ("LIBRAINFU", Sector::Pharmaceuticals),
    ("MARICO", Sector::Pharmaceuticals),
    ("NAVANAPHAR", Sector::Pharmaceuticals),
    ("ORIONINFU", Sector::Pharmaceuticals),
    ("ORIONPHARM", Sector::Pharmaceuticals),
    ("PHARMAID", Sector::Pharmaceuticals),
    ("RECKITTBEN", Sector::Pharmaceuticals),
    ("RENATA", Sector::Pharmaceuticals),
    ("SALVO", Sector::Pharmaceuticals),
    ("SILCOPHL", Sector::Pharmaceuticals),
    ("SILVAPHL", Sector::Pharmaceuticals),
    ("SQURPHARMA", Sector::Pharmaceuticals),
    ("TECHNODRUG", Sector::Pharmaceuticals),
    ("WATACHEM", Sector::Pharmaceuticals),

    // Banking
    ("ABBANK", Sector::Banking),
    ("ALARABANK", Sector::Banking),
    ("BANKASIA", Sector::Banking),
    ("BRACBANK", Sector::Banking),
    ("CITYBANK", Sector::Banking),
    ("DHAKABANK", Sector::Banking),
    ("DUTCHBANGL", Sector::Banking),
    ("EBL", Sector::Banking),
    ("EXIMBANK", Sector::Banking),
    ("FIRSTSBANK", Sector::Banking),
    ("GIB", Sector::Banking),
    ("ICBIBANK", Sector::Banking),
    ("IFIC", Sector::Banking),
    ("ISLAMIBANK", Sector::Banking),
    ("JAMUNABANK", Sector::Banking),
    ("MERCANBANK", Sector::Banking),
    ("MIDLANDBNK", Sector::Banking),
    ("MTB", Sector::Banking),
    ("NBL", Sector::Banking),
    ("NCCBANK", Sector::Banking),
    ("NRBBANK", Sector::Banking),
    ("NRBCBANK", Sector::Banking),
    ("ONEBANKPLC", Sector::Banking),
    ("PREMIERBAN", Sector::Banking),
    ("PRIMEBANK", Sector::Banking),
    ("PUBALIBANK", Sector::Banking),
    ("RUPALIBANK", Sector::Banking),
    ("SBACBANK", Sector::Banking),
    ("SHAHJABANK", Sector::Banking),
    ("SIBL", Sector::Banking),
    ("SOUTHEASTB", Sector::Banking),
    ("STANDBANKL", Sector::Banking),
    ("TRUSTBANK", Sector::Banking),
    ("UCB", Sector::Banking),
    ("UNIONBANK", Sector::Banking),
    ("UTTARABANK", Sector::Banking),

    // NBFI
    ("BAYLEASING", Sector::Nbfi),
    ("BDFINANCE", Sector::Nbfi),
    ("BIFC", Sector::Nbfi),
    ("DBH", Sector::Nbfi),
    ("FAREASTFIN", Sector::Nbfi),
    ("FASFIN", Sector::Nbfi),
    ("FIRSTFIN", Sector::Nbfi),
    ("GSPFINANCE", Sector::Nbfi),
    ("ICB", Sector::Nbfi),
    ("IDLC", Sector::Nbfi),
    ("ILFSL", Sector::Nbfi),
    ("IPDC", Sector::Nbfi),
    ("ISLAMICFIN", Sector::Nbfi),
    ("LANKABAFIN", Sector::Nbfi),
    ("MIDASFIN", Sector::Nbfi),
    ("NHFIL", Sector::Nbfi),
    ("PHOENIXFIN", Sector::Nbfi),
    ("PLFSL", Sector::Nbfi),
    ("PREMIERLEA", Sector::Nbfi),
    ("PRIMEFIN", Sector::Nbfi),
    ("UNIONCAP", Sector::Nbfi),
    ("UNITEDFIN", Sector::Nbfi),
    ("UTTARAFIN", Sector::Nbfi),

    // Cement
    ("ARAMITCEM", Sector::Cement),
    ("CONFIDCEM", Sector::Cement),
    ("CROWNCEMNT", Sector::Cement),
    ("HEIDELBCEM", Sector::Cement),
    ("LHB", Sector::Cement),
    ("MEGHNACEM", Sector::Cement),
    ("PREMIERCEM", Sector::Cement),

    // Textiles & RMG
    ("ACFL", Sector::TextilesRmg),
    ("AIL", Sector::TextilesRmg),
    ("AL-HAJTEX", Sector::TextilesRmg),
    ("ALIF", Sector::TextilesRmg),
    ("ALLTEX", Sector::TextilesRmg),
    ("ANLIMAYARN", Sector::TextilesRmg),
    ("APEXFOOT", Sector::TextilesRmg),
    ("APEXSPINN", Sector::TextilesRmg),
    ("APEXTANRY", Sector::TextilesRmg),
    ("ARGONDENIM", Sector::TextilesRmg),
    ("BATASHOE", Sector::TextilesRmg),
    ("CNATEX", Sector::TextilesRmg),
    ("DACCADYE", Sector::TextilesRmg),
    ("DSHGARME", Sector::TextilesRmg),
    ("DSSL", Sector::TextilesRmg),
    ("DELTASPINN", Sector::TextilesRmg),
    ("DULAMIACOT", Sector::TextilesRmg),
    ("ENVOYTEX", Sector::TextilesRmg),
    ("ESQUIRENIT", Sector::TextilesRmg),
    ("ETL", Sector::TextilesRmg),
    ("FAMILYTEX", Sector::TextilesRmg),
    ("FEKDIL", Sector::TextilesRmg),
    ("FORTUNE", Sector::TextilesRmg),
    ("GENNEXT", Sector::TextilesRmg),
    ("HFL", Sector::TextilesRmg),
    ("HRTEX", Sector::TextilesRmg),
    ("HWAWELLTEX", Sector::TextilesRmg),
    ("KTL", Sector::TextilesRmg),
    ("JUTESPINN", Sector::TextilesRmg),
    ("LEGACYFOOT", Sector::TextilesRmg),
    ("MAKSONSPIN", Sector::TextilesRmg),
    ("MALEKSPIN", Sector::TextilesRmg),
    ("MATINSPINN", Sector::TextilesRmg),
    ("METROSPIN", Sector::TextilesRmg),
    ("MHSML", Sector::TextilesRmg),
    ("MITHUNKNIT", Sector::TextilesRmg),
    ("MLDYEING", Sector::TextilesRmg),
    ("MONNOFABR", Sector::TextilesRmg),
    ("NEWLINE", Sector::TextilesRmg),
    ("NORTHERN", Sector::TextilesRmg),
    ("NURANI", Sector::TextilesRmg),
    ("PDL", Sector::TextilesRmg),
    ("PRIMETEX", Sector::TextilesRmg),
    ("PTL", Sector::TextilesRmg),
    ("QUEENSOUTH", Sector::TextilesRmg),
    ("RAHIMTEXT", Sector::TextilesRmg),
    ("REGENTTEX", Sector::TextilesRmg),
    ("RINGSHINE", Sector::TextilesRmg),
    ("SAFKOSPINN", Sector::TextilesRmg),
    ("SAIHAMCOT", Sector::TextilesRmg),
    ("SAIHAMTEX", Sector::TextilesRmg),
    ("SAMATALETH", Sector::TextilesRmg),
    ("SHARPIND", Sector::TextilesRmg),
    ("SHASHADNIM", Sector::TextilesRmg),
    ("SHEPHERD", Sector::TextilesRmg),
    ("SIMTEX", Sector::TextilesRmg),
    ("SONALIANSH", Sector::TextilesRmg),
    ("SONARGAON", Sector::TextilesRmg),
    ("SQUARETEXT", Sector::TextilesRmg),
    ("STYLECRAFT", Sector::TextilesRmg),
    ("TALLUSPIN", Sector::TextilesRmg),
    ("TAMIJTEX", Sector::TextilesRmg),
    ("TOSRIFA", Sector::TextilesRmg),
    ("TUNGHAI", Sector::TextilesRmg),
    ("VFSTDL", Sector::TextilesRmg),
    ("ZAHEENSPIN", Sector::TextilesRmg),
    ("ZAHINTEX", Sector::TextilesRmg),

    // Power & Energy
    ("AOL", Sector::PowerEnergy),
    ("BARKAPOWER", Sector::PowerEnergy),
    ("BDWELDING", Sector::PowerEnergy),
    ("BPPL", Sector::PowerEnergy),
    ("CVOPRL", Sector::PowerEnergy),
    ("DESCO", Sector::PowerEnergy),
    ("DOREENPWR", Sector::PowerEnergy),
    ("EASTRNLUB", Sector::PowerEnergy),
    ("EPGL", Sector::PowerEnergy),
    ("GBBPOWER", Sector::PowerEnergy),
    ("INTRACO", Sector::PowerEnergy),
    ("JAMUNAOIL", Sector::PowerEnergy),
    ("KPCL", Sector::PowerEnergy),
    ("LINDEBD", Sector::PowerEnergy),
    ("LRBDL", Sector::PowerEnergy),
    ("MJLBD", Sector::PowerEnergy),
    ("MPETROLEUM", Sector::PowerEnergy),
    ("PADMAOIL", Sector::PowerEnergy),
    ("POWERGRID", Sector::PowerEnergy),
    ("SPCL", Sector::PowerEnergy),
    ("SUMITPOWER", Sector::PowerEnergy),
    ("TITASGAS", Sector::PowerEnergy),
    ("UPGDCL", Sector::PowerEnergy),

    // Telecom
    ("BSCPLC", Sector::Telecom),
    ("GP", Sector::Telecom),
    ("ROBI", Sector::Telecom),

    // IT & Technology
    ("AAMRANET", Sector::It),
    ("AAMRATECH", Sector::It),
    ("ADNTEL", Sector::It),
    ("AGNISYSL", Sector::It),
    ("BDCOM", Sector::It),
    ("DAFODILCOM", Sector::It),
    ("EGEN", Sector::It),
    ("GENEXIL", Sector::It),
    ("INTECH", Sector::It),
    ("ISNLTD", Sector::It),
    ("ITC", Sector::It),

    // Ceramics
    ("FUWANGCER", Sector::Ceramics),
    ("MONNOCERA", Sector::Ceramics),
    ("RAKCERAMIC", Sector::Ceramics),
    ("SPCERAMICS", Sector::Ceramics),
    ("STANCERAM", Sector::Ceramics),

    // Food & Allied
    ("AMCL(PRAN)", Sector::FoodAllied),
    ("APEXFOODS", Sector::FoodAllied),
    ("BANGAS", Sector::FoodAllied),
    ("BATBC", Sector::FoodAllied),
    ("BDTHAIFOOD", Sector::FoodAllied),
    ("BEACHHATCH", Sector::FoodAllied),
    ("EMERALDOIL", Sector::FoodAllied),
    ("FINEFOODS", Sector::FoodAllied),
    ("FUWANGFOOD", Sector::FoodAllied),
    ("GEMINISEA", Sector::FoodAllied),
    ("GHAIL", Sector::FoodAllied),
    ("LOVELLO", Sector::FoodAllied),
    ("MEGCONMILK", Sector::FoodAllied),
    ("MEGHNAPET", Sector::FoodAllied),
    ("NTC", Sector::FoodAllied),
    ("OLYMPIC", Sector::FoodAllied),
    ("RAHIMAFOOD", Sector::FoodAllied),
    ("RDFOOD", Sector::FoodAllied),
    ("SHYAMPSUG", Sector::FoodAllied),
    ("UNILEVERCL", Sector::FoodAllied),
    ("ZEALBANGLA", Sector::FoodAllied),

    // Insurance
    ("AGRANINS", Sector::Insurance),
    ("ASIAINS", Sector::Insurance),
    ("ASIAPACINS", Sector::Insurance),
    ("BGIC", Sector::Insurance),
    ("BNICL", Sector::Insurance),
    ("CENTRALINS", Sector::Insurance),
    ("CITYGENINS", Sector::Insurance),
    ("CLICL", Sector::Insurance),
    ("CONTININS", Sector::Insurance),
    ("CRYSTALINS", Sector::Insurance),
    ("DELTALIFE", Sector::Insurance),
    ("DGIC", Sector::Insurance),
    ("DHAKAINS", Sector::Insurance),
    ("EASTERNINS", Sector::Insurance),
    ("EASTLAND", Sector::Insurance),
    ("EIL", Sector::Insurance),
    ("FAREASTLIF", Sector::Insurance),
    ("FEDERALINS", Sector::Insurance),
    ("GLOBALINS", Sector::Insurance),
    ("GREENDELT", Sector::Insurance),
    ("ICICL", Sector::Insurance),
    ("ISLAMIINS", Sector::Insurance),
    ("JANATAINS", Sector::Insurance),
    ("KARNAPHULI", Sector::Insurance),
    ("MEGHNAINS", Sector::Insurance),
    ("MEGHNALIFE", Sector::Insurance),
    ("MERCINS", Sector::Insurance),
    ("NATLIFEINS", Sector::Insurance),
    ("NITOLINS", Sector::Insurance),
    ("NORTHRNINS", Sector::Insurance),
    ("PADMALIFE", Sector::Insurance),
    ("PARAMOUNT", Sector::Insurance),
    ("PEOPLESINS", Sector::Insurance),
    ("PHENIXINS", Sector::Insurance),
    ("PIONEERINS", Sector::Insurance),
    ("POPULARLIF", Sector::Insurance),
    ("PRAGATIINS", Sector::Insurance),
    ("PRAGATILIF", Sector::Insurance),
    ("PRIMEINSUR", Sector::Insurance),
    ("PRIMELIFE", Sector::Insurance),
    ("PROGRESLIF", Sector::Insurance),
    ("PROVATIINS", Sector::Insurance),
    ("PURABIGEN", Sector::Insurance),
    ("RELIANCINS", Sector::Insurance),
    ("REPUBLIC", Sector::Insurance),
    ("RUPALIINS", Sector::Insurance),
    ("RUPALILIFE", Sector::Insurance),
    ("SANDHANINS", Sector::Insurance),
    ("SICL", Sector::Insurance),
    ("SIPLC", Sector::Insurance),
    ("SONALILIFE", Sector::Insurance),
    ("SONARBAINS", Sector::Insurance),
    ("STANDARINS", Sector::Insurance),
    ("SUNLIFEINS", Sector::Insurance),
    ("TAKAFULINS", Sector::Insurance),
    ("TILIL", Sector::Insurance),
    ("UNIONINS", Sector::Insurance),
    ("UNITEDINS", Sector::Insurance),

    // Engineering
    ("AFTABAUTO", Sector::Engineering),
    ("ANWARGALV", Sector::Engineering),
    ("APOLOISPAT", Sector::Engineering),
    ("ATLASBANG", Sector::Engineering),
    ("AZIZPIPES", Sector::Engineering),
    ("BBS", Sector::Engineering),
    ("BBSCABLES", Sector::Engineering),
    ("BDAUTOCA", Sector::Engineering),
    ("BDLAMPS", Sector::Engineering),
    ("BDTHAI", Sector::Engineering),
    ("BENGALWTL", Sector::Engineering),
    ("BSRMLTD", Sector::Engineering),
    ("BSRMSTEEL", Sector::Engineering),
    ("COPPERTECH", Sector::Engineering),
    ("DESHBANDHU", Sector::Engineering),
    ("DOMINAGE", Sector::Engineering),
    ("ECABLES", Sector::Engineering),
    ("GOLDENSON", Sector::Engineering),
    ("GPHISPAT", Sector::Engineering),
    ("IFADAUTOS", Sector::Engineering),
    ("KAY&QUE", Sector::Engineering),
    ("KDSALTD", Sector::Engineering),
    ("MIRAKHTER", Sector::Engineering),
    ("MONNOAGML", Sector::Engineering),
    ("NAHEEACP", Sector::Engineering),
    ("NAVANACNG", Sector::Engineering),
    ("NPOLYMER", Sector::Engineering),
    ("NTLTUBES", Sector::Engineering),
    ("OAL", Sector::Engineering),
    ("OIMEX", Sector::Engineering),
    ("QUASEMIND", Sector::Engineering),
    ("RANFOUNDRY", Sector::Engineering),
    ("RENWICKJA", Sector::Engineering),
    ("RSRMSTEEL", Sector::Engineering),
    ("RUNNERAUTO", Sector::Engineering),
    ("SALAMCRST", Sector::Engineering),
    ("SHURWID", Sector::Engineering),
    ("SINGERBD", Sector::Engineering),
    ("SSSTEEL", Sector::Engineering),
    ("WALTONHIL", Sector::Engineering),
    ("WMSHIPYARD", Sector::Engineering),
    ("YPL", Sector::Engineering),

    // Miscellaneous
    ("AMANFEED", Sector::Miscellaneous),
    ("ARAMIT", Sector::Miscellaneous),
    ("BDSERVICE", Sector::Miscellaneous),
    ("BERGERPBL", Sector::Miscellaneous),
    ("BESTHLDNG", Sector::Miscellaneous),
    ("BEXIMCO", Sector::Miscellaneous),
    ("BPML", Sector::Miscellaneous),
    ("BSC", Sector::Miscellaneous),
    ("EHL", Sector::Miscellaneous),
    ("GQBALLPEN", Sector::Miscellaneous),
    ("HAKKANIPUL", Sector::Miscellaneous),
    ("HAMI", Sector::Miscellaneous),
    ("INDEXAGRO", Sector::Miscellaneous),
    ("KBPPWBIL", Sector::Miscellaneous),
    ("KPPL", Sector::Miscellaneous),
    ("MAGURAPLEX", Sector::Miscellaneous),
    ("MIRACLEIND", Sector::Miscellaneous),
    ("MONOSPOOL", Sector::Miscellaneous),
    ("NFML", Sector::Miscellaneous),
    ("PENINSULA", Sector::Miscellaneous),
    ("SAIFPOWER", Sector::Miscellaneous),
    ("SAMORITA", Sector::Miscellaneous),
    ("SAPORTL", Sector::Miscellaneous),
    ("SAVAREFR", Sector::Miscellaneous),
    ("SEAPEARL", Sector::Miscellaneous),
    ("SINOBANGLA", Sector::Miscellaneous),
    ("SKTRIMS", Sector::Miscellaneous),
    ("SONALIPAPR", Sector::Miscellaneous),
    ("UNIQUEHRL", Sector::Miscellaneous),
    ("USMANIAGL", Sector::Miscellaneous),
];

static SECTOR_BY_SYMBOL: LazyLock<HashMap<&'static str, Sector>> =
    LazyLock::new(|| SYMBOLS.iter().copied().collect());

/// Sector for a DSE trading code, `Sector::Unknown` when unlisted here.
pub fn sector_for(symbol: &str) -> Sector {
    let code = symbol.trim().to_ascii_uppercase();
    SECTOR_BY_SYMBOL.get(code.as_str()).copied().unwrap_or(Sector::Unknown)
}

pub fn profile(sector: Sector) -> &'static SectorProfile {
    PROFILES
        .iter()
        .find(|p| p.sector == sector)
        .unwrap_or(&PROFILES[PROFILES.len() - 1])
}

pub fn profile_for_symbol(symbol: &str) -> &'static SectorProfile {
    profile(sector_for(symbol))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(sector_for("SQURPHARMA"), Sector::Pharmaceuticals);
        assert_eq!(sector_for("squrpharma"), Sector::Pharmaceuticals);
        assert_eq!(sector_for(" gp "), Sector::Telecom);
    }

    #[test]
    fn test_unknown_symbol() {
        assert_eq!(sector_for("NOSUCHCODE"), Sector::Unknown);
        let p = profile_for_symbol("NOSUCHCODE");
        assert_eq!(p.display_name, "Unclassified");
        assert!(!p.defensive);
    }

    #[test]
    fn test_every_sector_has_a_profile() {
        let sectors = [
            Sector::Pharmaceuticals,
            Sector::Banking,
            Sector::Nbfi,
            Sector::Cement,
            Sector::Fmcg,
            Sector::TextilesRmg,
            Sector::PowerEnergy,
            Sector::Telecom,
            Sector::It,
            Sector::Ceramics,
            Sector::Steel,
            Sector::FoodAllied,
            Sector::Insurance,
            Sector::Engineering,
            Sector::Miscellaneous,
            Sector::Unknown,
        ];
        for sector in sectors {
            assert_eq!(profile(sector).sector, sector);
        }
    }

    #[test]
    fn test_profiles() {
        let bank = profile(sector_for("BRACBANK"));
        assert_eq!(bank.cyclicality, Level::High);
        assert_eq!(bank.verdict, "High Risk/Reward");

        let power = profile(sector_for("UPGDCL"));
        assert!(power.defensive);
        assert_eq!(power.growth_potential, Level::Low);
    }

    #[test]
    fn test_symbols_are_unique_uppercase() {
        assert_eq!(SECTOR_BY_SYMBOL.len(), SYMBOLS.len());
        assert!(SYMBOLS.iter().all(|(code, _)| code.to_ascii_uppercase() == *code));
    }
}
