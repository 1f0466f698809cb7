pub mod elasticsearch_utils;
