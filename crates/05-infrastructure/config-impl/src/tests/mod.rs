//! 配置实现测试
