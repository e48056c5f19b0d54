//! 调色板条目

use crate::tree;
use fastnbt::Value;
use std::collections::BTreeMap;

/// 调色板中的一种方块状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockDescriptor {
    /// 命名空间标识，如 `minecraft:oak_stairs`
    pub name: String,
    /// 方块属性，如 `facing=east`
    pub properties: BTreeMap<String, String>,
}

impl BlockDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: BTreeMap::new(),
        }
    }

    /// 解析 `minecraft:oak_stairs[facing=east,half=top]`
    pub fn parse_state(state: &str) -> Self {
        let Some((name, rest)) = state.split_once('[') else {
            return Self::new(state.trim());
        };
        let properties = rest
            .trim_end_matches(']')
            .split(',')
            .filter_map(|pair| pair.split_once('='))
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
            .collect();
        Self {
            name: name.trim().to_string(),
            properties,
        }
    }

    /// Litematica 调色板条目 `{Name, Properties}`；也接受纯字符串
    pub fn from_nbt(value: &Value) -> Option<Self> {
        if let Value::String(state) = value {
            return Some(Self::parse_state(state));
        }
        let name = tree::get_str(value, "Name")?;
        let properties = tree::get_compound(value, "Properties")
            .map(|props| {
                props
                    .iter()
                    .filter_map(|(k, v)| match v {
                        Value::String(s) => Some((k.clone(), s.clone())),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();
        Some(Self {
            name: name.to_string(),
            properties,
        })
    }

    pub fn is_air(&self) -> bool {
        is_air(&self.name)
    }

    /// 带属性的完整状态字符串
    pub fn state_string(&self) -> String {
        if self.properties.is_empty() {
            return self.name.clone();
        }
        let props: Vec<String> = self
            .properties
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        format!("{}[{}]", self.name, props.join(","))
    }
}

/// 空气判定：完全等于 `air`，或任一 `:`/`_` 分段为 `air`（`cave_air`、`void_air`）
pub fn is_air(id: &str) -> bool {
    let id = id.split('[').next().unwrap_or(id);
    id.split([':', '_']).any(|segment| segment == "air")
}
