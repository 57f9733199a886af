pub mod depreciation;
