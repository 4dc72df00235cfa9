//! # 常用接口模块
//!
//! 本模块提供单元测试/集成测试中常用的断言宏
