//! Static labels for well-known protocol contracts.
//!
//! Spenders in approval events are usually routers, lending pools, or
//! marketplaces; annotating them makes the feed readable. Flat table keyed
//! by lowercase address (router deployments share addresses across chains).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Dex,
    Bridge,
    Lending,
    Staking,
    Wallet,
    Other,
}

#[derive(Debug, Clone, Copy)]
pub struct AddressLabel {
    pub name: &'static str,
    pub kind: LabelKind,
}

const fn label(name: &'static str, kind: LabelKind) -> AddressLabel {
    AddressLabel { name, kind }
}

#[rustfmt::skip]
const LABELS: &[(&str, AddressLabel)] = &[
    // Uniswap
    ("0x68b3465833fb72a70ecdf485e0e4c7bd8665fc45", label("Uniswap V3 Router", LabelKind::Dex)),
    ("0xe592427a0aece92de3edee1f18e0157c05861564", label("Uniswap V3 Router", LabelKind::Dex)),
    ("0x7a250d5630b4cf539739df2c5dacb4c659f2488d", label("Uniswap V2 Router", LabelKind::Dex)),
    // 1inch
    ("0x1111111254eeb25477b68fb85ed929f73a960582", label("1inch V5 Router", LabelKind::Dex)),
    // Curve
    ("0xd51a44d3fae010294c616388b506acda1bfaae46", label("Curve Tricrypto", LabelKind::Dex)),
    // Aave
    ("0x7d2768de32b0b80b7a3454c06bdac94a69ddc7a9", label("Aave V2 Pool", LabelKind::Lending)),
    ("0x87870bca3f3fd6335c3f4ce8392d69350b4fa4e2", label("Aave V3 Pool", LabelKind::Lending)),
    // SushiSwap
    ("0xd9e1ce17f2641f24ae83637ab66a2cca9c378b9f", label("SushiSwap Router", LabelKind::Dex)),
    // Compound
    ("0x3d9819210a31b4961b30ef54be2aed79b9c9cd3b", label("Compound Comptroller", LabelKind::Lending)),
    // Balancer
    ("0xba12222222228d8ba445958a75a0704d566bf2c8", label("Balancer Vault", LabelKind::Dex)),
    // 0x Protocol
    ("0xdef1c0ded9bec7f1a1670819833240f027b25eff", label("0x Exchange Proxy", LabelKind::Dex)),
    // OpenSea
    ("0x00000000000000adc04c56bf30ac9d3c0aaf14dc", label("OpenSea Seaport", LabelKind::Other)),
    // PancakeSwap (BSC)
    ("0x10ed43c718714eb63d5aa57b78b54704e256024e", label("PancakeSwap Router", LabelKind::Dex)),
    ("0x13f4ea83d0bd40e75c8222255bc855a974568dd4", label("PancakeSwap V3 Router", LabelKind::Dex)),
    // Venus (BSC)
    ("0xfd36e2c2a6789db23113685031d7f16329158384", label("Venus Comptroller", LabelKind::Lending)),
];

/// Look up a label by address, case-insensitive. None for unknown addresses.
pub fn lookup(address: &str) -> Option<&'static AddressLabel> {
    let needle = address.to_ascii_lowercase();
    LABELS
        .iter()
        .find(|(addr, _)| *addr == needle)
        .map(|(_, l)| l)
}
