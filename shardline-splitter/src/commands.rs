//! Static tables of the commands the splitter routes.
//!
//! Every name appears in exactly one table; the dispatch registry is built
//! from these at startup and treats them as read-only. Names are listed
//! lowercase; client verbs are case-folded before lookup.

/// Single-key commands: routed whole to the shard owning the key at
/// position 1, reply passed through unchanged.
pub const SIMPLE_COMMANDS: &[&str] = &[
    "append",
    "bitcount",
    "bitfield",
    "bitpos",
    "decr",
    "decrby",
    "dump",
    "expire",
    "expireat",
    "geoadd",
    "geodist",
    "geohash",
    "geopos",
    "georadius_ro",
    "georadiusbymember_ro",
    "get",
    "getbit",
    "getrange",
    "getset",
    "hdel",
    "hexists",
    "hget",
    "hgetall",
    "hincrby",
    "hincrbyfloat",
    "hkeys",
    "hlen",
    "hmget",
    "hmset",
    "hscan",
    "hset",
    "hsetnx",
    "hstrlen",
    "hvals",
    "incr",
    "incrby",
    "incrbyfloat",
    "lindex",
    "linsert",
    "llen",
    "lpop",
    "lpush",
    "lpushx",
    "lrange",
    "lrem",
    "lset",
    "ltrim",
    "persist",
    "pexpire",
    "pexpireat",
    "pfadd",
    "pfcount",
    "psetex",
    "pttl",
    "restore",
    "rpop",
    "rpush",
    "rpushx",
    "sadd",
    "scard",
    "set",
    "setbit",
    "setex",
    "setnx",
    "setrange",
    "sismember",
    "smembers",
    "spop",
    "srandmember",
    "srem",
    "sscan",
    "strlen",
    "ttl",
    "type",
    "zadd",
    "zcard",
    "zcount",
    "zincrby",
    "zlexcount",
    "zrange",
    "zrangebylex",
    "zrangebyscore",
    "zrank",
    "zrem",
    "zremrangebylex",
    "zremrangebyrank",
    "zremrangebyscore",
    "zrevrange",
    "zrevrangebylex",
    "zrevrangebyscore",
    "zrevrank",
    "zscan",
    "zscore",
];

/// Script commands: `EVAL script numkeys key [key ...] arg [arg ...]`,
/// routed whole to the shard owning the first declared key.
pub const EVAL_COMMANDS: &[&str] = &["eval", "evalsha"];

/// Multi-key commands whose per-key reply is an integer and whose aggregate
/// reply is the sum across keys.
pub const SUM_RESULT_COMMANDS: &[&str] = &["del", "exists", "touch", "unlink"];

/// Multi-key read, fanned out one sub-request per key.
pub const MGET: &str = "mget";

/// Multi-key write, fanned out one `SET` per key/value pair.
pub const MSET: &str = "mset";

/// ASCII case-fold a verb for registry lookup.
pub(crate) fn lowered(name: &[u8]) -> Vec<u8> {
    let mut name = name.to_vec();
    name.make_ascii_lowercase();
    name
}
