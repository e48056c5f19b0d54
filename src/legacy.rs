//! 旧版（1.13 扁平化之前）数字方块 ID 到命名空间标识的映射

/// 空气标识
pub const AIR: &str = "minecraft:air";

/// 木材种类，按数据值顺序
pub const WOOD_SPECIES: &[&str] = &["oak", "spruce", "birch", "jungle", "acacia", "dark_oak"];

/// 16 种染色颜色，按数据值顺序
pub const DYE_COLORS: &[&str] = &[
    "white",
    "orange",
    "magenta",
    "light_blue",
    "yellow",
    "lime",
    "pink",
    "gray",
    "light_gray",
    "cyan",
    "purple",
    "blue",
    "brown",
    "green",
    "red",
    "black",
];

const STONE_KINDS: &[&str] = &[
    "stone",
    "granite",
    "polished_granite",
    "diorite",
    "polished_diorite",
    "andesite",
    "polished_andesite",
];
const DIRT_KINDS: &[&str] = &["dirt", "coarse_dirt", "podzol"];
const SAND_KINDS: &[&str] = &["sand", "red_sand"];
const SPONGE_KINDS: &[&str] = &["sponge", "wet_sponge"];
const SANDSTONE_KINDS: &[&str] = &["sandstone", "chiseled_sandstone", "cut_sandstone"];
const RED_SANDSTONE_KINDS: &[&str] = &[
    "red_sandstone",
    "chiseled_red_sandstone",
    "cut_red_sandstone",
];
const TALL_GRASS_KINDS: &[&str] = &["dead_bush", "grass", "fern"];
const FLOWER_KINDS: &[&str] = &[
    "poppy",
    "blue_orchid",
    "allium",
    "azure_bluet",
    "red_tulip",
    "orange_tulip",
    "white_tulip",
    "pink_tulip",
    "oxeye_daisy",
];
const STONE_SLAB_KINDS: &[&str] = &[
    "smooth_stone",
    "sandstone",
    "petrified_oak",
    "cobblestone",
    "brick",
    "stone_brick",
    "nether_brick",
    "quartz",
];
const INFESTED_KINDS: &[&str] = &[
    "stone",
    "cobblestone",
    "stone_bricks",
    "mossy_stone_bricks",
    "cracked_stone_bricks",
    "chiseled_stone_bricks",
];
const STONE_BRICK_KINDS: &[&str] = &[
    "stone_bricks",
    "mossy_stone_bricks",
    "cracked_stone_bricks",
    "chiseled_stone_bricks",
];
const COBBLESTONE_WALL_KINDS: &[&str] = &["cobblestone_wall", "mossy_cobblestone_wall"];
const PRISMARINE_KINDS: &[&str] = &["prismarine", "prismarine_bricks", "dark_prismarine"];
const DOUBLE_PLANT_KINDS: &[&str] = &[
    "sunflower",
    "lilac",
    "tall_grass",
    "large_fern",
    "rose_bush",
    "peony",
];

/// 按数据值循环选取变体
fn pick(kinds: &[&'static str], index: u8) -> &'static str {
    kinds[index as usize % kinds.len()]
}

/// 依赖数据值的方块
fn variant_name(id: u16, aux: u8) -> Option<String> {
    let name = match id {
        1 => pick(STONE_KINDS, aux).to_string(),
        3 => pick(DIRT_KINDS, aux).to_string(),
        5 => format!("{}_planks", pick(WOOD_SPECIES, aux)),
        6 => format!("{}_sapling", pick(WOOD_SPECIES, aux & 0x7)),
        12 => pick(SAND_KINDS, aux).to_string(),
        // 高两位是朝向轴
        17 => format!("{}_log", pick(&WOOD_SPECIES[..4], aux & 0x3)),
        18 => format!("{}_leaves", pick(&WOOD_SPECIES[..4], aux & 0x3)),
        19 => pick(SPONGE_KINDS, aux).to_string(),
        24 => pick(SANDSTONE_KINDS, aux).to_string(),
        31 => pick(TALL_GRASS_KINDS, aux).to_string(),
        35 => format!("{}_wool", pick(DYE_COLORS, aux)),
        38 => pick(FLOWER_KINDS, aux).to_string(),
        // 第 4 位是上/下半砖
        43 | 44 => format!("{}_slab", pick(STONE_SLAB_KINDS, aux & 0x7)),
        95 => format!("{}_stained_glass", pick(DYE_COLORS, aux)),
        97 => format!("infested_{}", pick(INFESTED_KINDS, aux)),
        98 => pick(STONE_BRICK_KINDS, aux).to_string(),
        125 | 126 => format!("{}_slab", pick(WOOD_SPECIES, aux & 0x7)),
        139 => pick(COBBLESTONE_WALL_KINDS, aux).to_string(),
        159 => format!("{}_terracotta", pick(DYE_COLORS, aux)),
        160 => format!("{}_stained_glass_pane", pick(DYE_COLORS, aux)),
        161 => format!("{}_leaves", pick(&WOOD_SPECIES[4..], aux & 0x3)),
        162 => format!("{}_log", pick(&WOOD_SPECIES[4..], aux & 0x3)),
        168 => pick(PRISMARINE_KINDS, aux).to_string(),
        171 => format!("{}_carpet", pick(DYE_COLORS, aux)),
        175 => pick(DOUBLE_PLANT_KINDS, aux & 0x7).to_string(),
        179 => pick(RED_SANDSTONE_KINDS, aux).to_string(),
        251 => format!("{}_concrete", pick(DYE_COLORS, aux)),
        252 => format!("{}_concrete_powder", pick(DYE_COLORS, aux)),
        _ => return None,
    };
    Some(name)
}

/// 与数据值无关的方块（不含命名空间）
fn base_name(id: u16) -> Option<&'static str> {
    let name = match id {
        0 => "air",
        2 => "grass_block",
        4 => "cobblestone",
        7 => "bedrock",
        8 | 9 => "water",
        10 | 11 => "lava",
        13 => "gravel",
        14 => "gold_ore",
        15 => "iron_ore",
        16 => "coal_ore",
        20 => "glass",
        21 => "lapis_ore",
        22 => "lapis_block",
        23 => "dispenser",
        25 => "note_block",
        26 => "red_bed",
        27 => "powered_rail",
        28 => "detector_rail",
        29 => "sticky_piston",
        30 => "cobweb",
        32 => "dead_bush",
        33 => "piston",
        34 => "piston_head",
        36 => "moving_piston",
        37 => "dandelion",
        39 => "brown_mushroom",
        40 => "red_mushroom",
        41 => "gold_block",
        42 => "iron_block",
        45 => "bricks",
        46 => "tnt",
        47 => "bookshelf",
        48 => "mossy_cobblestone",
        49 => "obsidian",
        50 => "torch",
        51 => "fire",
        52 => "spawner",
        53 => "oak_stairs",
        54 => "chest",
        55 => "redstone_wire",
        56 => "diamond_ore",
        57 => "diamond_block",
        58 => "crafting_table",
        59 => "wheat",
        60 => "farmland",
        61 | 62 => "furnace",
        63 => "oak_sign",
        64 => "oak_door",
        65 => "ladder",
        66 => "rail",
        67 => "cobblestone_stairs",
        68 => "oak_wall_sign",
        69 => "lever",
        70 => "stone_pressure_plate",
        71 => "iron_door",
        72 => "oak_pressure_plate",
        73 | 74 => "redstone_ore",
        75 | 76 => "redstone_torch",
        77 => "stone_button",
        78 => "snow",
        79 => "ice",
        80 => "snow_block",
        81 => "cactus",
        82 => "clay",
        83 => "sugar_cane",
        84 => "jukebox",
        85 => "oak_fence",
        86 => "carved_pumpkin",
        87 => "netherrack",
        88 => "soul_sand",
        89 => "glowstone",
        90 => "nether_portal",
        91 => "jack_o_lantern",
        92 => "cake",
        93 | 94 => "repeater",
        96 => "oak_trapdoor",
        99 => "brown_mushroom_block",
        100 => "red_mushroom_block",
        101 => "iron_bars",
        102 => "glass_pane",
        103 => "melon",
        104 => "pumpkin_stem",
        105 => "melon_stem",
        106 => "vine",
        107 => "oak_fence_gate",
        108 => "brick_stairs",
        109 => "stone_brick_stairs",
        110 => "mycelium",
        111 => "lily_pad",
        112 => "nether_bricks",
        113 => "nether_brick_fence",
        114 => "nether_brick_stairs",
        115 => "nether_wart",
        116 => "enchanting_table",
        117 => "brewing_stand",
        118 => "cauldron",
        119 => "end_portal",
        120 => "end_portal_frame",
        121 => "end_stone",
        122 => "dragon_egg",
        123 | 124 => "redstone_lamp",
        127 => "cocoa",
        128 => "sandstone_stairs",
        129 => "emerald_ore",
        130 => "ender_chest",
        131 => "tripwire_hook",
        132 => "tripwire",
        133 => "emerald_block",
        134 => "spruce_stairs",
        135 => "birch_stairs",
        136 => "jungle_stairs",
        137 => "command_block",
        138 => "beacon",
        140 => "flower_pot",
        141 => "carrots",
        142 => "potatoes",
        143 => "oak_button",
        144 => "skeleton_skull",
        145 => "anvil",
        146 => "trapped_chest",
        147 => "light_weighted_pressure_plate",
        148 => "heavy_weighted_pressure_plate",
        149 | 150 => "comparator",
        151 | 178 => "daylight_detector",
        152 => "redstone_block",
        153 => "nether_quartz_ore",
        154 => "hopper",
        155 => "quartz_block",
        156 => "quartz_stairs",
        157 => "activator_rail",
        158 => "dropper",
        163 => "acacia_stairs",
        164 => "dark_oak_stairs",
        165 => "slime_block",
        166 => "barrier",
        167 => "iron_trapdoor",
        169 => "sea_lantern",
        170 => "hay_block",
        172 => "terracotta",
        173 => "coal_block",
        174 => "packed_ice",
        176 => "white_banner",
        177 => "white_wall_banner",
        180 => "red_sandstone_stairs",
        181 | 182 => "red_sandstone_slab",
        183 => "spruce_fence_gate",
        184 => "birch_fence_gate",
        185 => "jungle_fence_gate",
        186 => "dark_oak_fence_gate",
        187 => "acacia_fence_gate",
        188 => "spruce_fence",
        189 => "birch_fence",
        190 => "jungle_fence",
        191 => "dark_oak_fence",
        192 => "acacia_fence",
        193 => "spruce_door",
        194 => "birch_door",
        195 => "jungle_door",
        196 => "acacia_door",
        197 => "dark_oak_door",
        198 => "end_rod",
        199 => "chorus_plant",
        200 => "chorus_flower",
        201 => "purpur_block",
        202 => "purpur_pillar",
        203 => "purpur_stairs",
        204 | 205 => "purpur_slab",
        206 => "end_stone_bricks",
        207 => "beetroots",
        208 => "dirt_path",
        209 => "end_gateway",
        210 => "repeating_command_block",
        211 => "chain_command_block",
        212 => "frosted_ice",
        213 => "magma_block",
        214 => "nether_wart_block",
        215 => "red_nether_bricks",
        216 => "bone_block",
        217 => "structure_void",
        218 => "observer",
        255 => "structure_block",
        _ => return None,
    };
    Some(name)
}

/// 按颜色编号排列的 ID 段（潜影盒 219..=234，带釉陶瓦 235..=250）
fn color_range_name(id: u16) -> Option<String> {
    match id {
        219..=234 => Some(format!("{}_shulker_box", DYE_COLORS[(id - 219) as usize])),
        235..=250 => Some(format!("{}_glazed_terracotta", DYE_COLORS[(id - 235) as usize])),
        _ => None,
    }
}

/// 查表；没有映射时返回 `None`
pub fn lookup(id: u16, aux: u8) -> Option<String> {
    if let Some(name) = variant_name(id, aux).or_else(|| color_range_name(id)) {
        return Some(format!("minecraft:{}", name));
    }
    base_name(id).map(|name| format!("minecraft:{}", name))
}

/// 未知 ID 的占位标识，保留原始数字 ID 与数据值
pub fn placeholder(id: u16, aux: u8) -> String {
    format!("minecraft:unknown_{}_{}", id, aux)
}

/// 全函数：未知 ID 合成占位标识，从不失败
pub fn legacy_name(id: u16, aux: u8) -> String {
    lookup(id, aux).unwrap_or_else(|| placeholder(id, aux))
}
