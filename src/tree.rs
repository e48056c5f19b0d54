//! NBT 树的路径访问
//!
//! 三种格式乃至同一格式的不同导出版本会用不同的字段布局表达同一数据，
//! 所有模块都只通过这里读取 [`fastnbt::Value`]。路径缺失或类型不符时返回 `None`，从不 panic。

use fastnbt::Value;
use std::collections::HashMap;

/// 按点分路径取子节点；数字段可索引 `List`
pub fn get<'a>(tree: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(tree);
    }
    path.split('.').try_fold(tree, child)
}

fn child<'a>(node: &'a Value, name: &str) -> Option<&'a Value> {
    match node {
        Value::Compound(map) => map.get(name),
        Value::List(list) => name.parse::<usize>().ok().and_then(|i| list.get(i)),
        _ => None,
    }
}

/// 整数标量（Byte/Short/Int/Long）统一扩宽为 i64
pub fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Byte(v) => Some(*v as i64),
        Value::Short(v) => Some(*v as i64),
        Value::Int(v) => Some(*v as i64),
        Value::Long(v) => Some(*v),
        Value::Float(_)
        | Value::Double(_)
        | Value::String(_)
        | Value::ByteArray(_)
        | Value::IntArray(_)
        | Value::LongArray(_)
        | Value::List(_)
        | Value::Compound(_) => None,
    }
}

pub fn get_int(tree: &Value, path: &str) -> Option<i64> {
    get(tree, path).and_then(as_int)
}

pub fn get_str<'a>(tree: &'a Value, path: &str) -> Option<&'a str> {
    match get(tree, path)? {
        Value::String(s) => Some(s),
        _ => None,
    }
}

pub fn get_compound<'a>(tree: &'a Value, path: &str) -> Option<&'a HashMap<String, Value>> {
    match get(tree, path)? {
        Value::Compound(map) => Some(map),
        _ => None,
    }
}

pub fn get_list<'a>(tree: &'a Value, path: &str) -> Option<&'a [Value]> {
    match get(tree, path)? {
        Value::List(list) => Some(list.as_slice()),
        _ => None,
    }
}

pub fn get_bytes<'a>(tree: &'a Value, path: &str) -> Option<&'a [i8]> {
    match get(tree, path)? {
        Value::ByteArray(arr) => Some(&arr[..]),
        _ => None,
    }
}

pub fn get_ints<'a>(tree: &'a Value, path: &str) -> Option<&'a [i32]> {
    match get(tree, path)? {
        Value::IntArray(arr) => Some(&arr[..]),
        _ => None,
    }
}

pub fn get_longs<'a>(tree: &'a Value, path: &str) -> Option<&'a [i64]> {
    match get(tree, path)? {
        Value::LongArray(arr) => Some(&arr[..]),
        _ => None,
    }
}

/// 任意整数数组或整数列表，元素类型不符时整体返回 `None`
pub fn int_vec(value: &Value) -> Option<Vec<i64>> {
    match value {
        Value::ByteArray(arr) => Some(arr.iter().map(|&v| v as i64).collect()),
        Value::IntArray(arr) => Some(arr.iter().map(|&v| v as i64).collect()),
        Value::LongArray(arr) => Some(arr.to_vec()),
        Value::List(list) => list.iter().map(as_int).collect(),
        _ => None,
    }
}

pub fn get_int_vec(tree: &Value, path: &str) -> Option<Vec<i64>> {
    get(tree, path).and_then(int_vec)
}

/// 三元组：长度为 3 的整数数组/列表，或 `{x, y, z}` 复合标签
pub fn triple(value: &Value) -> Option<[i64; 3]> {
    if let Value::Compound(_) = value {
        return Some([
            get_int(value, "x")?,
            get_int(value, "y")?,
            get_int(value, "z")?,
        ]);
    }
    match int_vec(value)?.as_slice() {
        [x, y, z] => Some([*x, *y, *z]),
        _ => None,
    }
}

pub fn get_triple(tree: &Value, path: &str) -> Option<[i64; 3]> {
    get(tree, path).and_then(triple)
}
