//! Canonical parameter tables of the supported reader functions.
//!
//! Order is the wire enumeration. The native fuzz targets carry the same
//! tables; regenerate theirs with `duckfuzz schema --format native` after any
//! change here. Complex argument types (lists, structs, maps) are declared
//! as `Varchar`.

use super::ParamKind;

/// `read_csv` parameters.
pub(super) const READ_CSV: &[(&str, ParamKind)] = &[
    ("all_varchar", ParamKind::Boolean),
    ("allow_quoted_nulls", ParamKind::Boolean),
    ("auto_detect", ParamKind::Boolean),
    ("auto_type_candidates", ParamKind::Varchar),
    ("columns", ParamKind::Varchar),
    ("compression", ParamKind::Varchar),
    ("dateformat", ParamKind::Varchar),
    ("decimal_separator", ParamKind::Varchar),
    ("delim", ParamKind::Varchar),
    ("delimiter", ParamKind::Varchar),
    ("dtypes", ParamKind::Varchar),
    ("escape", ParamKind::Varchar),
    ("filename", ParamKind::Boolean),
    ("force_not_null", ParamKind::Varchar),
    ("header", ParamKind::Boolean),
    ("hive_partitioning", ParamKind::Boolean),
    ("ignore_errors", ParamKind::Boolean),
    ("max_line_size", ParamKind::Integer),
    ("names", ParamKind::Varchar),
    ("new_line", ParamKind::Varchar),
    ("normalize_names", ParamKind::Boolean),
    ("null_padding", ParamKind::Boolean),
    ("nullstr", ParamKind::Varchar),
    ("parallel", ParamKind::Boolean),
    ("quote", ParamKind::Varchar),
    ("sample_size", ParamKind::Integer),
    ("sep", ParamKind::Varchar),
    ("skip", ParamKind::Integer),
    ("timestampformat", ParamKind::Varchar),
    ("types", ParamKind::Varchar),
    ("union_by_name", ParamKind::Boolean),
    // undocumented
    ("buffer_size", ParamKind::Integer),
    ("column_names", ParamKind::Varchar),
    ("column_types", ParamKind::Varchar),
    ("comment", ParamKind::Varchar),
    ("date_format", ParamKind::Varchar),
    ("encoding", ParamKind::Varchar),
    ("force_quote", ParamKind::Varchar),
    ("hive_type", ParamKind::Varchar),
    ("hive_type_autocast", ParamKind::Boolean),
    ("hive_types", ParamKind::Varchar),
    ("hive_types_autocast", ParamKind::Boolean),
    ("maximum_line_size", ParamKind::Integer),
    ("null", ParamKind::Varchar),
    ("prefix", ParamKind::Varchar),
    ("rejects_limit", ParamKind::Integer),
    ("rejects_scan", ParamKind::Varchar),
    ("rejects_table", ParamKind::Varchar),
    ("rfc_4180", ParamKind::Boolean),
    ("store_rejects", ParamKind::Boolean),
    ("suffix", ParamKind::Varchar),
    ("timestamp_format", ParamKind::Varchar),
];

/// `read_json` parameters.
pub(super) const READ_JSON: &[(&str, ParamKind)] = &[
    ("auto_detect", ParamKind::Boolean),
    ("columns", ParamKind::Varchar),
    ("compression", ParamKind::Varchar),
    ("convert_strings_to_integers", ParamKind::Boolean),
    ("date_format", ParamKind::Varchar),
    ("dateform", ParamKind::Varchar),
    ("dateformat", ParamKind::Varchar),
    ("field_appearance_threshold", ParamKind::Double),
    ("filename", ParamKind::Varchar),
    ("format", ParamKind::Varchar),
    ("hive_partitioning", ParamKind::Boolean),
    ("hive_type", ParamKind::Varchar),
    ("hive_type_autocast", ParamKind::Boolean),
    ("hive_types", ParamKind::Varchar),
    ("hive_types_autocast", ParamKind::Boolean),
    ("ignore_errors", ParamKind::Boolean),
    ("map_inference_threshold", ParamKind::Integer),
    ("maximum_depth", ParamKind::Integer),
    ("maximum_object_size", ParamKind::Integer),
    ("maximum_sample_files", ParamKind::Integer),
    ("records", ParamKind::Varchar),
    ("sample_size", ParamKind::Integer),
    ("timestamp_format", ParamKind::Varchar),
    ("timestampform", ParamKind::Varchar),
    ("timestampformat", ParamKind::Varchar),
    ("union_by_name", ParamKind::Boolean),
];

/// `read_parquet` parameters.
pub(super) const READ_PARQUET: &[(&str, ParamKind)] = &[
    ("binary_as_string", ParamKind::Boolean),
    ("bloom_filter_false_positive_ratio", ParamKind::Double),
    ("can_have_nan", ParamKind::Boolean),
    ("chunk_size", ParamKind::Integer),
    ("codec", ParamKind::Varchar),
    ("compression_level", ParamKind::Integer),
    ("debug_use_openssl", ParamKind::Boolean),
    ("dictionary_compression_ratio_threshold", ParamKind::Varchar),
    ("dictionary_size_limit", ParamKind::Integer),
    ("encryption_config", ParamKind::Varchar),
    ("explicit_cardinality", ParamKind::Integer),
    ("field_ids", ParamKind::Varchar),
    ("file_row_number", ParamKind::Boolean),
    ("filename", ParamKind::Varchar),
    ("geoparquet_version", ParamKind::Varchar),
    ("hive_partitioning", ParamKind::Boolean),
    ("kv_metadata", ParamKind::Varchar),
    ("parquet_version", ParamKind::Varchar),
    ("row_group_size_bytes", ParamKind::Varchar),
    ("row_group_size", ParamKind::Integer),
    ("row_groups_per_file", ParamKind::Integer),
    ("schema", ParamKind::Varchar),
    ("shredding", ParamKind::Varchar),
    ("string_dictionary_page_size_limit", ParamKind::Integer),
    ("union_by_name", ParamKind::Boolean),
    ("write_bloom_filter", ParamKind::Boolean),
];
